//! The media primitive the player mirrors, and the typed handle widgets use to drive it.

use log::debug;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::Result;

pub mod events;
pub mod fullscreen;
pub mod properties;

pub use events::{MediaEventKind, NativeEvent};
pub use fullscreen::{FullscreenApi, FullscreenHandler, RootElement, UnsupportedFullscreen};
pub use properties::{MediaProperty, MediaSnapshot, MediaValue, MEDIA_PROPERTIES};

/// A buffered/played/seekable interval in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Identifier assigned to a text track by the media primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackKind {
    Subtitles,
    Captions,
    Descriptions,
    Chapters,
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTrackMode {
    #[default]
    Disabled,
    Hidden,
    Showing,
}

/// A text track as exposed by the media primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTrack {
    pub id: TrackId,
    pub kind: TextTrackKind,
    pub label: String,
    pub language: String,
    pub mode: TextTrackMode,
}

impl TextTrack {
    pub fn is_showing(&self) -> bool {
        self.mode == TextTrackMode::Showing
    }
}

/// Answer of `can_play_type`, mirroring the three capability strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanPlay {
    #[default]
    No,
    Maybe,
    Probably,
}

impl fmt::Display for CanPlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanPlay::No => write!(f, ""),
            CanPlay::Maybe => write!(f, "maybe"),
            CanPlay::Probably => write!(f, "probably"),
        }
    }
}

/// Capability surface of the native media element.
///
/// `play` and `pause` may start asynchronous work on the platform side. An
/// `Err` return stands for a rejected request (autoplay policy, interrupted
/// load) and is never surfaced as player state.
pub trait MediaElement: Send + Sync {
    fn play(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn load(&self);
    fn add_text_track(&self, kind: TextTrackKind, label: Option<&str>, language: Option<&str>) -> TextTrack;
    fn can_play_type(&self, mime_type: &str) -> CanPlay;

    fn current_time(&self) -> f64;
    fn set_current_time(&self, time: f64) -> Result<()>;
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&self, rate: f64);
    fn muted(&self) -> bool;
    fn set_muted(&self, muted: bool);
    fn volume(&self) -> f64;
    fn set_volume(&self, volume: f64);

    fn video_width(&self) -> u32;
    fn video_height(&self) -> u32;
    fn paused(&self) -> bool;
    fn text_tracks(&self) -> Vec<TextTrack>;
    fn set_text_track_mode(&self, id: TrackId, mode: TextTrackMode);

    /// Reads one of the normalized properties.
    ///
    /// The default covers the properties reachable through the methods above.
    /// Implementations that know more (buffered ranges, duration, source)
    /// override this and delegate to [`properties::read_common`] for the rest.
    fn property(&self, property: MediaProperty) -> MediaValue {
        properties::read_common(self, property)
    }
}

/// Read-through/write-through handle on the (possibly absent) media element.
///
/// Every method is a no-op or returns the element's default value while no
/// element is attached.
#[derive(Default)]
pub struct MediaHandle {
    element: RwLock<Option<Arc<dyn MediaElement>>>,
}

impl fmt::Debug for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl MediaHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, element: Arc<dyn MediaElement>) {
        *self.element.write() = Some(element);
    }

    pub fn detach(&self) -> Option<Arc<dyn MediaElement>> {
        self.element.write().take()
    }

    pub fn is_attached(&self) -> bool {
        self.element.read().is_some()
    }

    pub fn element(&self) -> Option<Arc<dyn MediaElement>> {
        self.element.read().clone()
    }

    pub fn play(&self) {
        if let Some(element) = self.element() {
            if let Err(e) = element.play() {
                debug!("Ignoring rejected play request: {}", e);
            }
        }
    }

    pub fn pause(&self) {
        if let Some(element) = self.element() {
            if let Err(e) = element.pause() {
                debug!("Ignoring rejected pause request: {}", e);
            }
        }
    }

    pub fn load(&self) {
        if let Some(element) = self.element() {
            element.load();
        }
    }

    pub fn toggle_play(&self) {
        let Some(element) = self.element() else {
            return;
        };
        let result = if element.paused() { element.play() } else { element.pause() };
        if let Err(e) = result {
            debug!("Ignoring rejected toggle-play request: {}", e);
        }
    }

    pub fn seek(&self, time: f64) {
        if let Some(element) = self.element() {
            if let Err(e) = element.set_current_time(time) {
                debug!("Ignoring failed seek to {}: {}", time, e);
            }
        }
    }

    pub fn forward(&self, seconds: f64) {
        if let Some(element) = self.element() {
            self.seek(element.current_time() + seconds);
        }
    }

    pub fn replay(&self, seconds: f64) {
        self.forward(-seconds);
    }

    pub fn current_time(&self) -> f64 {
        self.element().map_or(0.0, |e| e.current_time())
    }

    pub fn playback_rate(&self) -> f64 {
        self.element().map_or(1.0, |e| e.playback_rate())
    }

    pub fn set_playback_rate(&self, rate: f64) {
        if let Some(element) = self.element() {
            element.set_playback_rate(rate);
        }
    }

    pub fn muted(&self) -> bool {
        self.element().is_some_and(|e| e.muted())
    }

    pub fn set_muted(&self, muted: bool) {
        if let Some(element) = self.element() {
            element.set_muted(muted);
        }
    }

    pub fn volume(&self) -> f64 {
        self.element().map_or(1.0, |e| e.volume())
    }

    /// Sets the volume, clamped to `[0, 1]`.
    pub fn set_volume(&self, volume: f64) {
        if let Some(element) = self.element() {
            element.set_volume(clamp_volume(volume));
        }
    }

    pub fn video_width(&self) -> u32 {
        self.element().map_or(0, |e| e.video_width())
    }

    pub fn video_height(&self) -> u32 {
        self.element().map_or(0, |e| e.video_height())
    }

    pub fn paused(&self) -> bool {
        self.element().map_or(true, |e| e.paused())
    }

    pub fn text_tracks(&self) -> Vec<TextTrack> {
        self.element().map(|e| e.text_tracks()).unwrap_or_default()
    }

    pub fn add_text_track(&self, kind: TextTrackKind, label: Option<&str>, language: Option<&str>) -> Option<TextTrack> {
        self.element().map(|e| e.add_text_track(kind, label, language))
    }

    pub fn can_play_type(&self, mime_type: &str) -> CanPlay {
        self.element().map_or(CanPlay::No, |e| e.can_play_type(mime_type))
    }

    /// Marks `id` as the only showing track; every other track is hidden.
    pub fn show_text_track(&self, id: Option<TrackId>) {
        let Some(element) = self.element() else {
            return;
        };
        for track in element.text_tracks() {
            let mode = if Some(track.id) == id { TextTrackMode::Showing } else { TextTrackMode::Hidden };
            if track.mode != mode {
                element.set_text_track_mode(track.id, mode);
            }
        }
    }
}

/// Clamps a volume to `[0, 1]`. NaN maps to 0.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}
