//! Transitions reporting what the media element and the seek bar did.

use crate::media::{MediaEventKind, MediaSnapshot, TextTrack};
use crate::state::Transition;

use super::ActionContext;

/// Wraps a native media event and the snapshot taken when it fired.
pub fn ingest(event: MediaEventKind, props: MediaSnapshot) -> Transition {
    Transition::media(event, props)
}

/// Takes a fresh snapshot of the attached element and wraps `event` with it.
pub fn capture(ctx: &ActionContext<'_>, event: MediaEventKind) -> Transition {
    let element = ctx.media.element();
    ingest(event, MediaSnapshot::capture(element.as_deref()))
}

pub fn handle_seeking_time(time: f64) -> Transition {
    Transition::SeekingTime { time }
}

pub fn handle_end_seeking(time: f64) -> Transition {
    Transition::EndSeeking { time }
}

pub fn activate_text_track(text_track: Option<TextTrack>) -> Transition {
    Transition::ActivateTextTrack { text_track }
}

pub fn handle_picture_in_picture_change(is_picture_in_picture: bool) -> Transition {
    Transition::PictureInPictureChange { is_picture_in_picture }
}

pub fn handle_loop_change(looping: bool) -> Transition {
    Transition::LoopChange { looping }
}
