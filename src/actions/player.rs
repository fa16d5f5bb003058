//! Operations that drive the media element and report what was done.
//!
//! Each takes an optional [`Operation`] overriding the default label shown
//! by transient feedback widgets. Failed media calls are swallowed; the
//! operation is still reported.

use crate::state::{Operation, Transition};

use super::ActionContext;

fn label(operation: Option<Operation>, action: impl Into<String>) -> Transition {
    Transition::operate(operation.unwrap_or_else(|| Operation::new(action)))
}

pub fn play(ctx: &ActionContext<'_>, operation: Option<Operation>) -> Transition {
    ctx.media.play();
    label(operation, "play")
}

pub fn pause(ctx: &ActionContext<'_>, operation: Option<Operation>) -> Transition {
    ctx.media.pause();
    label(operation, "pause")
}

pub fn toggle_play(ctx: &ActionContext<'_>, operation: Option<Operation>) -> Transition {
    ctx.media.toggle_play();
    label(operation, "toggle-play")
}

pub fn seek(ctx: &ActionContext<'_>, time: f64, operation: Option<Operation>) -> Transition {
    ctx.media.seek(time);
    label(operation, "seek")
}

pub fn forward(ctx: &ActionContext<'_>, seconds: f64, operation: Option<Operation>) -> Transition {
    ctx.media.forward(seconds);
    label(operation, format!("forward-{}", seconds))
}

pub fn replay(ctx: &ActionContext<'_>, seconds: f64, operation: Option<Operation>) -> Transition {
    ctx.media.replay(seconds);
    label(operation, format!("replay-{}", seconds))
}

pub fn change_rate(ctx: &ActionContext<'_>, rate: f64, operation: Option<Operation>) -> Transition {
    ctx.media.set_playback_rate(rate);
    label(operation, "change-rate")
}

/// Sets the volume, clamped to `[0, 1]`.
pub fn change_volume(ctx: &ActionContext<'_>, volume: f64, operation: Option<Operation>) -> Transition {
    ctx.media.set_volume(volume);
    label(operation, "change-volume")
}

pub fn mute(ctx: &ActionContext<'_>, muted: bool, operation: Option<Operation>) -> Transition {
    ctx.media.set_muted(muted);
    label(operation, if muted { "muted" } else { "unmuted" })
}

/// Enters or leaves fullscreen through the environment capability.
///
/// Without a usable capability the player only flips its own flag, which
/// the host can use to emulate fullscreen with layout alone.
pub fn toggle_fullscreen(ctx: &ActionContext<'_>, operation: Option<Operation>) -> Transition {
    if !ctx.fullscreen.enabled() {
        return Transition::FullscreenChange {
            is_fullscreen: !ctx.state.player.is_fullscreen,
        };
    }

    if ctx.fullscreen.is_fullscreen() {
        ctx.fullscreen.exit();
    } else if let Some(root) = ctx.root {
        ctx.fullscreen.request(root);
    }
    label(operation, "toggle-fullscreen")
}

pub fn toggle_picture_in_picture(ctx: &ActionContext<'_>) -> Transition {
    Transition::PictureInPictureChange {
        is_picture_in_picture: !ctx.state.player.is_picture_in_picture,
    }
}

pub fn change_quality(quality: impl Into<String>) -> Transition {
    Transition::QualityChange { quality: quality.into() }
}

pub fn take_screenshot() -> Transition {
    Transition::operate(Operation::with_source("screenshot", "control"))
}

pub fn toggle_theater_mode(is_theater: bool) -> Transition {
    Transition::TheaterModeChange { is_theater }
}

pub fn handle_fullscreen_change(is_fullscreen: bool) -> Transition {
    Transition::FullscreenChange { is_fullscreen }
}

pub fn activate(activity: bool) -> Transition {
    Transition::PlayerActivate { activity }
}

pub fn user_activate(activity: bool) -> Transition {
    Transition::UserActivate { activity }
}
