//! The action map: semantic operations resolved against one player.
//!
//! The functions in [`player`] and [`media`] are pure with respect to the
//! store; they take an explicit [`ActionContext`] and return the
//! [`Transition`] to dispatch. [`Actions`] binds them to a [`Manager`] and
//! dispatches the result.

use std::sync::Arc;

use crate::manager::Manager;
use crate::media::{FullscreenApi, MediaEventKind, MediaHandle, MediaSnapshot, RootElement, TextTrack};
use crate::state::{Operation, RootState, Transition};

pub mod media;
pub mod player;

/// Everything an action may read or drive, borrowed for one call.
pub struct ActionContext<'a> {
    pub media: &'a MediaHandle,
    pub fullscreen: &'a dyn FullscreenApi,
    pub root: Option<&'a RootElement>,
    pub state: &'a RootState,
}

/// Actions bound to a player. Every method dispatches its transition and
/// returns the resulting state.
pub struct Actions<'a> {
    manager: &'a Manager,
}

impl<'a> Actions<'a> {
    pub(crate) fn new(manager: &'a Manager) -> Self {
        Self { manager }
    }

    fn run(&self, action: impl FnOnce(&ActionContext<'_>) -> Transition) -> Arc<RootState> {
        let state = self.manager.get_state();
        let root = self.manager.root_element();
        let fullscreen = self.manager.fullscreen_api();
        let ctx = ActionContext {
            media: self.manager.media(),
            fullscreen: fullscreen.as_ref(),
            root: root.as_ref(),
            state: &state,
        };
        let transition = action(&ctx);
        self.manager.dispatch(transition)
    }

    pub fn play(&self, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::play(ctx, operation))
    }

    pub fn pause(&self, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::pause(ctx, operation))
    }

    pub fn toggle_play(&self, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::toggle_play(ctx, operation))
    }

    pub fn seek(&self, time: f64, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::seek(ctx, time, operation))
    }

    pub fn forward(&self, seconds: f64, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::forward(ctx, seconds, operation))
    }

    pub fn replay(&self, seconds: f64, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::replay(ctx, seconds, operation))
    }

    pub fn change_rate(&self, rate: f64, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::change_rate(ctx, rate, operation))
    }

    pub fn change_volume(&self, volume: f64, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::change_volume(ctx, volume, operation))
    }

    pub fn mute(&self, muted: bool, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::mute(ctx, muted, operation))
    }

    pub fn toggle_fullscreen(&self, operation: Option<Operation>) -> Arc<RootState> {
        self.run(|ctx| player::toggle_fullscreen(ctx, operation))
    }

    pub fn toggle_picture_in_picture(&self) -> Arc<RootState> {
        self.run(player::toggle_picture_in_picture)
    }

    pub fn change_quality(&self, quality: impl Into<String>) -> Arc<RootState> {
        self.manager.dispatch(player::change_quality(quality))
    }

    pub fn take_screenshot(&self) -> Arc<RootState> {
        self.manager.dispatch(player::take_screenshot())
    }

    pub fn toggle_theater_mode(&self, is_theater: bool) -> Arc<RootState> {
        self.manager.dispatch(player::toggle_theater_mode(is_theater))
    }

    pub fn handle_fullscreen_change(&self, is_fullscreen: bool) -> Arc<RootState> {
        self.manager.dispatch(player::handle_fullscreen_change(is_fullscreen))
    }

    pub fn activate(&self, activity: bool) -> Arc<RootState> {
        self.manager.dispatch(player::activate(activity))
    }

    pub fn user_activate(&self, activity: bool) -> Arc<RootState> {
        self.manager.dispatch(player::user_activate(activity))
    }

    /// Reports a media event with a snapshot the caller already took.
    pub fn ingest(&self, event: MediaEventKind, props: MediaSnapshot) -> Arc<RootState> {
        self.manager.dispatch(media::ingest(event, props))
    }

    /// Reports a media event, snapshotting the attached element now.
    pub fn capture(&self, event: MediaEventKind) -> Arc<RootState> {
        self.run(|ctx| media::capture(ctx, event))
    }

    pub fn handle_seeking_time(&self, time: f64) -> Arc<RootState> {
        self.manager.dispatch(media::handle_seeking_time(time))
    }

    pub fn handle_end_seeking(&self, time: f64) -> Arc<RootState> {
        self.manager.dispatch(media::handle_end_seeking(time))
    }

    pub fn activate_text_track(&self, text_track: Option<TextTrack>) -> Arc<RootState> {
        self.manager.dispatch(media::activate_text_track(text_track))
    }

    pub fn handle_picture_in_picture_change(&self, is_picture_in_picture: bool) -> Arc<RootState> {
        self.manager.dispatch(media::handle_picture_in_picture_change(is_picture_in_picture))
    }

    pub fn handle_loop_change(&self, looping: bool) -> Arc<RootState> {
        self.manager.dispatch(media::handle_loop_change(looping))
    }
}
