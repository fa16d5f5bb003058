use log::debug;
use std::sync::{Arc, Weak};

use crate::listeners::{self, DocumentEvent, DocumentEventKind, EventTarget, Key, ListenerGuard};
use crate::manager::Manager;
use crate::media::clamp_volume;
use crate::state::Operation;

use super::bezel::SHORTCUT_SOURCE;

fn shortcut(action: impl Into<String>) -> Option<Operation> {
    Some(Operation::with_source(action, SHORTCUT_SOURCE))
}

/// Keyboard control of a player while it is active.
pub struct Shortcut {
    _listener: ListenerGuard,
}

impl Shortcut {
    /// Listens for key presses on `document` for as long as the returned
    /// value lives.
    pub fn mount(manager: &Arc<Manager>, document: &Arc<dyn EventTarget>) -> Self {
        let manager: Weak<Manager> = Arc::downgrade(manager);
        let listener = listeners::attach(
            document,
            DocumentEventKind::KeyDown,
            Arc::new(move |event: &DocumentEvent| {
                if let (DocumentEvent::KeyDown(key), Some(manager)) = (event, manager.upgrade()) {
                    handle_key(&manager, *key);
                }
            }),
        );
        Self { _listener: listener }
    }
}

/// Applies the shortcut bound to `key`. Returns whether it was handled.
pub fn handle_key(manager: &Manager, key: Key) -> bool {
    let state = manager.get_state();
    let player = &state.player;
    if !player.is_active {
        return false;
    }

    let config = manager.config();
    let actions = manager.actions();
    match key {
        Key::Space | Key::Char('k') | Key::Char('K') => {
            if player.paused {
                actions.play(shortcut("play"));
            } else {
                actions.pause(shortcut("pause"));
            }
        }
        Key::Left => {
            let step = config.seek_step_secs;
            actions.replay(step, shortcut(format!("replay-{}", step)));
        }
        Key::Right => {
            let step = config.seek_step_secs;
            actions.forward(step, shortcut(format!("forward-{}", step)));
        }
        Key::Char('j') | Key::Char('J') => {
            let step = config.seek_step_secs * 2.0;
            actions.replay(step, shortcut(format!("replay-{}", step)));
        }
        Key::Char('l') | Key::Char('L') => {
            let step = config.seek_step_secs * 2.0;
            actions.forward(step, shortcut(format!("forward-{}", step)));
        }
        Key::Up => {
            let volume = clamp_volume(player.volume + config.shortcut_volume_step);
            actions.change_volume(volume, shortcut("volume-up"));
        }
        Key::Down => {
            let volume = clamp_volume(player.volume - config.shortcut_volume_step);
            actions.change_volume(volume, shortcut("volume-down"));
        }
        Key::Char('m') | Key::Char('M') => {
            let muted = !player.muted;
            actions.mute(muted, shortcut(if muted { "muted" } else { "unmuted" }));
        }
        Key::Char('f') | Key::Char('F') => {
            actions.toggle_fullscreen(shortcut("toggle-fullscreen"));
        }
        Key::Home => {
            actions.seek(0.0, shortcut("seek"));
        }
        Key::End => {
            actions.seek(player.duration, shortcut("seek"));
        }
        Key::Digit(digit) if digit <= 9 => {
            let time = player.duration * f64::from(digit) / 10.0;
            actions.seek(time, shortcut("seek"));
        }
        other => {
            debug!("No shortcut bound to {:?}", other);
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;
    use crate::media::{MediaElement, MediaEventKind, NativeEvent};
    use crate::media::RootElement;
    use crate::test_utils::{FakeDocument, FakeFullscreen, FakeMedia};

    fn active_player() -> (Arc<Manager>, Arc<FakeMedia>) {
        let manager = Arc::new(Manager::new(PlayerConfig::default()));
        let media = Arc::new(FakeMedia::new());
        media.set_duration(100.0);
        manager.attach_media(media.clone());
        manager.handle_native_event(NativeEvent::Media(MediaEventKind::DurationChange));
        manager.handle_focus();
        (manager, media)
    }

    fn last_operation(manager: &Manager) -> Operation {
        manager.get_state().operation.operation.clone()
    }

    #[test]
    fn inactive_player_ignores_keys() {
        let (manager, media) = active_player();
        manager.handle_blur();
        assert!(!handle_key(&manager, Key::Space));
        assert_eq!(media.play_calls(), 0);
    }

    #[test]
    fn space_toggles_with_shortcut_source() {
        let (manager, media) = active_player();
        assert!(handle_key(&manager, Key::Space));
        assert!(!media.paused());
        assert_eq!(last_operation(&manager), Operation::with_source("play", "shortcut"));
    }

    #[test]
    fn arrows_seek_and_change_volume() {
        let (manager, media) = active_player();
        handle_key(&manager, Key::Right);
        assert_eq!(media.current_time(), 5.0);
        handle_key(&manager, Key::Char('l'));
        assert_eq!(media.current_time(), 15.0);
        handle_key(&manager, Key::Left);
        assert_eq!(media.current_time(), 10.0);
        assert_eq!(last_operation(&manager).action, "replay-5");

        handle_key(&manager, Key::Down);
        assert!((media.volume() - 0.95).abs() < 1e-9);
        assert_eq!(last_operation(&manager), Operation::with_source("volume-down", "shortcut"));
    }

    #[test]
    fn digits_seek_to_tenths() {
        let (manager, media) = active_player();
        handle_key(&manager, Key::Digit(7));
        assert!((media.current_time() - 70.0).abs() < 1e-9);
        handle_key(&manager, Key::Home);
        assert_eq!(media.current_time(), 0.0);
        assert!(!handle_key(&manager, Key::Digit(12)));
        assert!(!handle_key(&manager, Key::Enter));
    }

    #[test]
    fn end_seeks_to_the_duration() {
        let (manager, media) = active_player();
        assert!(handle_key(&manager, Key::End));
        assert_eq!(media.current_time(), 100.0);
        assert_eq!(last_operation(&manager), Operation::with_source("seek", "shortcut"));
    }

    #[test]
    fn f_requests_fullscreen_with_shortcut_source() {
        let fullscreen = Arc::new(FakeFullscreen::new(true));
        let manager = Arc::new(Manager::with_fullscreen(PlayerConfig::default(), fullscreen.clone()));
        manager.set_root_element(RootElement::new("player"));
        manager.handle_focus();

        assert!(handle_key(&manager, Key::Char('f')));
        assert_eq!(fullscreen.request_calls(), 1);
        assert_eq!(
            last_operation(&manager),
            Operation::with_source("toggle-fullscreen", "shortcut")
        );
    }

    #[test]
    fn mute_reads_current_state() {
        let (manager, media) = active_player();
        handle_key(&manager, Key::Char('m'));
        assert!(media.muted());
        assert_eq!(last_operation(&manager).action, "muted");
    }

    #[test]
    fn mounted_shortcut_listens_until_dropped() {
        let (manager, media) = active_player();
        let doc = Arc::new(FakeDocument::new());
        let target: Arc<dyn EventTarget> = doc.clone();
        let shortcut = Shortcut::mount(&manager, &target);
        assert_eq!(doc.listener_count(), 1);

        doc.dispatch(&DocumentEvent::KeyDown(Key::Char('k')));
        assert_eq!(media.play_calls(), 1);

        drop(shortcut);
        assert_eq!(doc.listener_count(), 0);
    }
}
