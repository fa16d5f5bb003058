//! Component types of the built-in widgets.
//!
//! Composition compares component types by reference, so every built-in
//! widget has exactly one shared instance.

use lazy_static::lazy_static;
use std::sync::Arc;

use crate::compose::ComponentType;

lazy_static! {
    pub static ref VIDEO: Arc<ComponentType> = ComponentType::new("Video");
    pub static ref POSTER_IMAGE: Arc<ComponentType> = ComponentType::new("PosterImage");
    pub static ref LOADING_SPINNER: Arc<ComponentType> = ComponentType::new("LoadingSpinner");
    pub static ref BEZEL: Arc<ComponentType> = ComponentType::new("Bezel");
    pub static ref BIG_PLAY_BUTTON: Arc<ComponentType> = ComponentType::new("BigPlayButton");
    pub static ref CONTROL_BAR: Arc<ComponentType> = ComponentType::new("ControlBar");
    pub static ref SHORTCUT: Arc<ComponentType> = ComponentType::new("Shortcut");

    pub static ref PLAY_TOGGLE: Arc<ComponentType> = ComponentType::with_control_id("PlayToggle", "PlayToggle");
    pub static ref VOLUME_MENU_BUTTON: Arc<ComponentType> = ComponentType::new("VolumeMenuButton");
    pub static ref CURRENT_TIME_DISPLAY: Arc<ComponentType> = ComponentType::new("CurrentTimeDisplay");
    pub static ref TIME_DIVIDER: Arc<ComponentType> = ComponentType::new("TimeDivider");
    pub static ref DURATION_DISPLAY: Arc<ComponentType> = ComponentType::new("DurationDisplay");
    pub static ref PROGRESS_CONTROL: Arc<ComponentType> = ComponentType::new("ProgressControl");
    pub static ref FULLSCREEN_TOGGLE: Arc<ComponentType> = ComponentType::new("FullscreenToggle");
}

/// Looks up a built-in component type by display name.
pub fn builtin(display_name: &str) -> Option<Arc<ComponentType>> {
    let all: [&Arc<ComponentType>; 14] = [
        &*VIDEO,
        &*POSTER_IMAGE,
        &*LOADING_SPINNER,
        &*BEZEL,
        &*BIG_PLAY_BUTTON,
        &*CONTROL_BAR,
        &*SHORTCUT,
        &*PLAY_TOGGLE,
        &*VOLUME_MENU_BUTTON,
        &*CURRENT_TIME_DISPLAY,
        &*TIME_DIVIDER,
        &*DURATION_DISPLAY,
        &*PROGRESS_CONTROL,
        &*FULLSCREEN_TOGGLE,
    ];
    all.into_iter()
        .find(|component| component.display_name() == display_name)
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_shared_instances() {
        let a = builtin("PlayToggle").unwrap();
        assert!(Arc::ptr_eq(&a, &PLAY_TOGGLE));
        assert_eq!(a.control_id(), Some("PlayToggle"));
        assert!(builtin("SkipIntroButton").is_none());
    }
}
