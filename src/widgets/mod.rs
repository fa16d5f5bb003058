//! Behaviour of the stateful built-in widgets plus the view-model maths the
//! stateless ones render from.

use crate::state::PlaybackState;
use crate::utils::format_time;

pub mod bezel;
pub mod catalog;
pub mod shortcut;
pub mod slider;

pub use bezel::{Bezel, BezelView};
pub use shortcut::Shortcut;
pub use slider::{SeekBar, Slider, SliderControl, VolumeBar};

/// Volume icon bucket: 0 when muted or silent, then 1 to 3 by loudness.
pub fn volume_level(state: &PlaybackState) -> u8 {
    if state.muted || state.volume == 0.0 {
        0
    } else if state.volume < 0.33 {
        1
    } else if state.volume < 0.67 {
        2
    } else {
        3
    }
}

/// Fraction of the seek bar to fill, in `[0, 1]`.
pub fn seek_percent(state: &PlaybackState) -> f64 {
    if state.duration <= 0.0 || !state.duration.is_finite() {
        return 0.0;
    }
    let percent = state.display_time() / state.duration;
    if percent.is_nan() || percent < 0.0 {
        0.0
    } else {
        percent.min(1.0)
    }
}

/// Time under a pointer at `fraction` of the seek bar.
///
/// The very end maps to just before it so that seeking there does not
/// immediately end playback.
pub fn seek_time_at(fraction: f64, duration: f64) -> f64 {
    let duration = if duration.is_finite() && duration > 0.0 { duration } else { 0.0 };
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let time = fraction * duration;
    if time == duration && duration > 0.0 {
        time - 0.1
    } else {
        time
    }
}

/// Volume bar fill: 0 while muted.
pub fn volume_percent(state: &PlaybackState) -> f64 {
    if state.muted {
        0.0
    } else {
        state.volume
    }
}

/// Fraction of the media buffered ahead of the shown position.
pub fn buffered_percent(state: &PlaybackState) -> f64 {
    let Some(ranges) = &state.buffered else {
        return 0.0;
    };
    if state.duration <= 0.0 || !state.duration.is_finite() {
        return 0.0;
    }
    let time = state.display_time();
    let end = ranges
        .iter()
        .find(|range| range.contains(time))
        .or_else(|| ranges.last())
        .map_or(0.0, |range| range.end);
    (end / state.duration).clamp(0.0, 1.0)
}

/// `current / duration` as shown next to the seek bar.
pub fn time_labels(state: &PlaybackState) -> (String, String) {
    (
        format_time(state.display_time(), state.duration),
        format_time(state.duration, state.duration),
    )
}
