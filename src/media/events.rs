use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Media events whose handling merges a property snapshot into the playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaEventKind {
    // Loading
    LoadStart,
    DurationChange,
    LoadedMetadata,
    LoadedData,
    ProgressChange,
    Suspend,
    Abort,
    Emptied,
    Stalled,

    // Readiness
    CanPlay,
    CanPlayThrough,
    Waiting,

    // Playback state
    Playing,
    Play,
    Pause,
    End,
    Seeking,
    Seeked,
    TimeUpdate,
    RateChange,
    VolumeChange,
    Resize,

    // Failure
    Error,
}

impl MediaEventKind {
    /// Native DOM event name that produces this kind.
    pub fn event_name(self) -> &'static str {
        match self {
            MediaEventKind::LoadStart => "loadstart",
            MediaEventKind::DurationChange => "durationchange",
            MediaEventKind::LoadedMetadata => "loadedmetadata",
            MediaEventKind::LoadedData => "loadeddata",
            MediaEventKind::ProgressChange => "progress",
            MediaEventKind::Suspend => "suspend",
            MediaEventKind::Abort => "abort",
            MediaEventKind::Emptied => "emptied",
            MediaEventKind::Stalled => "stalled",
            MediaEventKind::CanPlay => "canplay",
            MediaEventKind::CanPlayThrough => "canplaythrough",
            MediaEventKind::Waiting => "waiting",
            MediaEventKind::Playing => "playing",
            MediaEventKind::Play => "play",
            MediaEventKind::Pause => "pause",
            MediaEventKind::End => "ended",
            MediaEventKind::Seeking => "seeking",
            MediaEventKind::Seeked => "seeked",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::RateChange => "ratechange",
            MediaEventKind::VolumeChange => "volumechange",
            MediaEventKind::Resize => "resize",
            MediaEventKind::Error => "error",
        }
    }

    const ALL: [MediaEventKind; 23] = [
        MediaEventKind::LoadStart,
        MediaEventKind::DurationChange,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::LoadedData,
        MediaEventKind::ProgressChange,
        MediaEventKind::Suspend,
        MediaEventKind::Abort,
        MediaEventKind::Emptied,
        MediaEventKind::Stalled,
        MediaEventKind::CanPlay,
        MediaEventKind::CanPlayThrough,
        MediaEventKind::Waiting,
        MediaEventKind::Playing,
        MediaEventKind::Play,
        MediaEventKind::Pause,
        MediaEventKind::End,
        MediaEventKind::Seeking,
        MediaEventKind::Seeked,
        MediaEventKind::TimeUpdate,
        MediaEventKind::RateChange,
        MediaEventKind::VolumeChange,
        MediaEventKind::Resize,
        MediaEventKind::Error,
    ];
}

impl fmt::Display for MediaEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Every native event the player listens to on the media element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeEvent {
    Media(MediaEventKind),
    EnterPictureInPicture,
    LeavePictureInPicture,
    TextTrackAdded,
    TextTrackRemoved,
}

impl FromStr for NativeEvent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enterpictureinpicture" => Ok(NativeEvent::EnterPictureInPicture),
            "leavepictureinpicture" => Ok(NativeEvent::LeavePictureInPicture),
            "addtrack" => Ok(NativeEvent::TextTrackAdded),
            "removetrack" => Ok(NativeEvent::TextTrackRemoved),
            name => MediaEventKind::ALL
                .iter()
                .copied()
                .find(|kind| kind.event_name() == name)
                .map(NativeEvent::Media)
                .ok_or_else(|| Error::Media(format!("unsupported media event '{}'", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_native_event_names() {
        assert_eq!("ended".parse::<NativeEvent>().unwrap(), NativeEvent::Media(MediaEventKind::End));
        assert_eq!("progress".parse::<NativeEvent>().unwrap(), NativeEvent::Media(MediaEventKind::ProgressChange));
        assert_eq!("leavepictureinpicture".parse::<NativeEvent>().unwrap(), NativeEvent::LeavePictureInPicture);
        assert_eq!("addtrack".parse::<NativeEvent>().unwrap(), NativeEvent::TextTrackAdded);
        assert!("fullscreenchange".parse::<NativeEvent>().is_err());
    }

    #[test]
    fn every_kind_parses_back_from_its_event_name() {
        for kind in MediaEventKind::ALL {
            assert_eq!(kind.event_name().parse::<NativeEvent>().unwrap(), NativeEvent::Media(kind));
        }
    }
}
