//! Draggable, keyboard-steppable bars: the seek bar and the volume bar.
//!
//! A [`Slider`] owns its document listeners. Key steps are only heard while
//! the slider has focus; pointer move/up are only heard during a drag that
//! started on the slider. Both sets are released on blur, on pointer up and
//! when the slider is dropped.

use log::debug;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use crate::listeners::{self, DocumentEvent, DocumentEventKind, EventTarget, Key, ListenerGuard};
use crate::manager::Manager;
use crate::widgets::seek_time_at;

/// What a slider drives.
pub trait SliderControl: Send + Sync {
    fn step_forward(&self);
    fn step_back(&self);
    /// Pointer moved to `fraction` of the bar during a drag.
    fn on_move(&self, fraction: f64);
    /// Drag ended at `fraction` of the bar.
    fn on_release(&self, fraction: f64);
}

pub struct Slider<C: SliderControl + 'static> {
    control: Arc<C>,
    document: Arc<dyn EventTarget>,
    key_listener: Mutex<Option<ListenerGuard>>,
    drag_listeners: Arc<Mutex<Vec<ListenerGuard>>>,
}

impl<C: SliderControl + 'static> Slider<C> {
    pub fn new(control: C, document: Arc<dyn EventTarget>) -> Self {
        Self {
            control: Arc::new(control),
            document,
            key_listener: Mutex::new(None),
            drag_listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn handle_focus(&self) {
        let mut key_listener = self.key_listener.lock();
        if key_listener.is_some() {
            return;
        }
        let control = Arc::clone(&self.control);
        *key_listener = Some(listeners::attach(
            &self.document,
            DocumentEventKind::KeyDown,
            Arc::new(move |event: &DocumentEvent| {
                if let DocumentEvent::KeyDown(key) = event {
                    match key {
                        Key::Left | Key::Down => control.step_back(),
                        Key::Right | Key::Up => control.step_forward(),
                        _ => {}
                    }
                }
            }),
        ));
    }

    pub fn handle_blur(&self) {
        let guard = self.key_listener.lock().take();
        drop(guard);
    }

    pub fn has_focus(&self) -> bool {
        self.key_listener.lock().is_some()
    }

    /// Starts a drag at `fraction` of the bar.
    pub fn handle_pointer_down(&self, fraction: f64) {
        self.release_drag();

        let on_move = {
            let control = Arc::clone(&self.control);
            listeners::attach(
                &self.document,
                DocumentEventKind::PointerMove,
                Arc::new(move |event: &DocumentEvent| {
                    if let DocumentEvent::PointerMove { fraction } = event {
                        control.on_move(*fraction);
                    }
                }),
            )
        };
        let on_up = {
            let control = Arc::clone(&self.control);
            let drag_listeners = Arc::downgrade(&self.drag_listeners);
            listeners::attach(
                &self.document,
                DocumentEventKind::PointerUp,
                Arc::new(move |event: &DocumentEvent| {
                    if let DocumentEvent::PointerUp { fraction } = event {
                        if let Some(drag_listeners) = drag_listeners.upgrade() {
                            let guards = std::mem::take(&mut *drag_listeners.lock());
                            drop(guards);
                        }
                        control.on_release(*fraction);
                    }
                }),
            )
        };
        self.drag_listeners.lock().extend([on_move, on_up]);

        self.control.on_move(fraction);
    }

    pub fn is_dragging(&self) -> bool {
        !self.drag_listeners.lock().is_empty()
    }

    /// Releases every listener the slider holds.
    pub fn unmount(&self) {
        self.handle_blur();
        self.release_drag();
    }

    fn release_drag(&self) {
        let guards = std::mem::take(&mut *self.drag_listeners.lock());
        if !guards.is_empty() {
            debug!("Releasing {} drag listeners", guards.len());
        }
    }
}

impl<C: SliderControl + 'static> Drop for Slider<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Seeks the media. Dragging previews the position and commits it on release.
pub struct SeekBar {
    manager: Weak<Manager>,
}

impl SeekBar {
    pub fn new(manager: &Arc<Manager>) -> Self {
        Self {
            manager: Arc::downgrade(manager),
        }
    }

    fn time_at(manager: &Manager, fraction: f64) -> f64 {
        seek_time_at(fraction, manager.get_state().player.duration)
    }
}

impl SliderControl for SeekBar {
    fn step_forward(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.actions().forward(manager.config().seek_step_secs, None);
        }
    }

    fn step_back(&self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.actions().replay(manager.config().seek_step_secs, None);
        }
    }

    fn on_move(&self, fraction: f64) {
        if let Some(manager) = self.manager.upgrade() {
            let time = Self::time_at(&manager, fraction);
            manager.actions().handle_seeking_time(time);
        }
    }

    fn on_release(&self, fraction: f64) {
        if let Some(manager) = self.manager.upgrade() {
            let time = Self::time_at(&manager, fraction);
            let actions = manager.actions();
            actions.seek(time, None);
            actions.handle_end_seeking(time);
        }
    }
}

/// Sets the volume. Any change unmutes first.
pub struct VolumeBar {
    manager: Weak<Manager>,
}

impl VolumeBar {
    pub fn new(manager: &Arc<Manager>) -> Self {
        Self {
            manager: Arc::downgrade(manager),
        }
    }

    fn set_volume(&self, volume: impl FnOnce(&Manager) -> f64) {
        let Some(manager) = self.manager.upgrade() else {
            return;
        };
        let actions = manager.actions();
        if manager.media().muted() {
            actions.mute(false, None);
        }
        actions.change_volume(volume(&*manager), None);
    }
}

impl SliderControl for VolumeBar {
    fn step_forward(&self) {
        self.set_volume(|manager| manager.media().volume() + manager.config().volume_step);
    }

    fn step_back(&self) {
        self.set_volume(|manager| manager.media().volume() - manager.config().volume_step);
    }

    fn on_move(&self, fraction: f64) {
        self.set_volume(|_| fraction);
    }

    fn on_release(&self, fraction: f64) {
        self.set_volume(|_| fraction);
    }
}
