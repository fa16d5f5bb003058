//! Snapshots of the media element's observable properties.
//!
//! On nearly every native media event the player reads the same fixed set
//! of properties and merges them into the playback state. Extraction has no
//! side effects and yields an empty snapshot when no element is attached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::{MediaElement, TextTrack, TimeRange};
use crate::Error;

/// Properties captured from the media element on every ingested event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaProperty {
    Src,
    CurrentSrc,
    CrossOrigin,
    NetworkState,
    Preload,
    Buffered,
    ReadyState,
    Seeking,
    CurrentTime,
    Duration,
    Paused,
    PlaybackRate,
    Played,
    Seekable,
    Ended,
    Autoplay,
    Loop,
    Volume,
    Muted,
    DefaultMuted,
    AudioTracks,
    VideoTracks,
    TextTracks,
    Width,
    Height,
    VideoWidth,
    VideoHeight,
    Poster,
    Error,
    SrcObject,
}

/// The fixed extraction list, in extraction order.
pub const MEDIA_PROPERTIES: [MediaProperty; 30] = [
    MediaProperty::Src,
    MediaProperty::CurrentSrc,
    MediaProperty::CrossOrigin,
    MediaProperty::NetworkState,
    MediaProperty::Preload,
    MediaProperty::Buffered,
    MediaProperty::ReadyState,
    MediaProperty::Seeking,
    MediaProperty::CurrentTime,
    MediaProperty::Duration,
    MediaProperty::Paused,
    MediaProperty::PlaybackRate,
    MediaProperty::Played,
    MediaProperty::Seekable,
    MediaProperty::Ended,
    MediaProperty::Autoplay,
    MediaProperty::Loop,
    MediaProperty::Volume,
    MediaProperty::Muted,
    MediaProperty::DefaultMuted,
    MediaProperty::AudioTracks,
    MediaProperty::VideoTracks,
    MediaProperty::TextTracks,
    MediaProperty::Width,
    MediaProperty::Height,
    MediaProperty::VideoWidth,
    MediaProperty::VideoHeight,
    MediaProperty::Poster,
    MediaProperty::Error,
    MediaProperty::SrcObject,
];

impl MediaProperty {
    /// The DOM-style property name.
    pub fn name(self) -> &'static str {
        match self {
            MediaProperty::Src => "src",
            MediaProperty::CurrentSrc => "currentSrc",
            MediaProperty::CrossOrigin => "crossOrigin",
            MediaProperty::NetworkState => "networkState",
            MediaProperty::Preload => "preload",
            MediaProperty::Buffered => "buffered",
            MediaProperty::ReadyState => "readyState",
            MediaProperty::Seeking => "seeking",
            MediaProperty::CurrentTime => "currentTime",
            MediaProperty::Duration => "duration",
            MediaProperty::Paused => "paused",
            MediaProperty::PlaybackRate => "playbackRate",
            MediaProperty::Played => "played",
            MediaProperty::Seekable => "seekable",
            MediaProperty::Ended => "ended",
            MediaProperty::Autoplay => "autoplay",
            MediaProperty::Loop => "loop",
            MediaProperty::Volume => "volume",
            MediaProperty::Muted => "muted",
            MediaProperty::DefaultMuted => "defaultMuted",
            MediaProperty::AudioTracks => "audioTracks",
            MediaProperty::VideoTracks => "videoTracks",
            MediaProperty::TextTracks => "textTracks",
            MediaProperty::Width => "width",
            MediaProperty::Height => "height",
            MediaProperty::VideoWidth => "videoWidth",
            MediaProperty::VideoHeight => "videoHeight",
            MediaProperty::Poster => "poster",
            MediaProperty::Error => "error",
            MediaProperty::SrcObject => "srcObject",
        }
    }
}

impl fmt::Display for MediaProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MediaProperty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MEDIA_PROPERTIES
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| Error::Media(format!("unknown media property '{}'", s)))
    }
}

/// The value of one media property.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum MediaValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Ranges(Vec<TimeRange>),
    Tracks(Vec<TextTrack>),
    Error { code: u16, message: String },
}

impl MediaValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MediaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MediaValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            MediaValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MediaValue::Null)
    }
}

impl From<bool> for MediaValue {
    fn from(value: bool) -> Self {
        MediaValue::Bool(value)
    }
}

impl From<f64> for MediaValue {
    fn from(value: f64) -> Self {
        MediaValue::Number(value)
    }
}

impl From<u32> for MediaValue {
    fn from(value: u32) -> Self {
        MediaValue::Number(f64::from(value))
    }
}

impl From<&str> for MediaValue {
    fn from(value: &str) -> Self {
        MediaValue::Text(value.to_string())
    }
}

impl From<String> for MediaValue {
    fn from(value: String) -> Self {
        MediaValue::Text(value)
    }
}

impl From<Vec<TimeRange>> for MediaValue {
    fn from(value: Vec<TimeRange>) -> Self {
        MediaValue::Ranges(value)
    }
}

impl From<Vec<TextTrack>> for MediaValue {
    fn from(value: Vec<TextTrack>) -> Self {
        MediaValue::Tracks(value)
    }
}

/// Flat property-name to value mapping, merged into the playback state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSnapshot(BTreeMap<MediaProperty, MediaValue>);

impl MediaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every property in [`MEDIA_PROPERTIES`] from `media`.
    pub fn capture(media: Option<&dyn MediaElement>) -> Self {
        let Some(media) = media else {
            return Self::default();
        };
        MEDIA_PROPERTIES
            .iter()
            .map(|&property| (property, media.property(property)))
            .collect()
    }

    pub fn with(mut self, property: MediaProperty, value: impl Into<MediaValue>) -> Self {
        self.insert(property, value);
        self
    }

    pub fn insert(&mut self, property: MediaProperty, value: impl Into<MediaValue>) {
        self.0.insert(property, value.into());
    }

    pub fn get(&self, property: MediaProperty) -> Option<&MediaValue> {
        self.0.get(&property)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MediaProperty, &MediaValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }
}

impl FromIterator<(MediaProperty, MediaValue)> for MediaSnapshot {
    fn from_iter<I: IntoIterator<Item = (MediaProperty, MediaValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Reads the properties every [`MediaElement`] can answer through its
/// required methods. Anything else is `Null`.
pub fn read_common<M: MediaElement + ?Sized>(media: &M, property: MediaProperty) -> MediaValue {
    match property {
        MediaProperty::CurrentTime => media.current_time().into(),
        MediaProperty::PlaybackRate => media.playback_rate().into(),
        MediaProperty::Muted => media.muted().into(),
        MediaProperty::Volume => media.volume().into(),
        MediaProperty::Paused => media.paused().into(),
        MediaProperty::VideoWidth => media.video_width().into(),
        MediaProperty::VideoHeight => media.video_height().into(),
        MediaProperty::TextTracks => media.text_tracks().into(),
        _ => MediaValue::Null,
    }
}
