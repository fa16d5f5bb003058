use serde::{Deserialize, Serialize};

use crate::media::{MediaEventKind, MediaSnapshot, TextTrack};

/// The most recent high-level operation, as shown by transient UI feedback.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Operation {
    pub action: String,
    pub source: String,
}

impl Operation {
    /// An operation with an empty source, the label actions use by default.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            source: String::new(),
        }
    }

    pub fn with_source(action: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            source: source.into(),
        }
    }
}

/// A state change, consumed by the slice reducers.
///
/// Each reducer handles the variants that concern its slice and returns its
/// input unchanged (same reference) for all others. Unrecognised `kind` tags
/// deserialize to [`Transition::Unknown`], which no reducer handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Transition {
    /// A user or system operation. Bumps the operation counter.
    Operate { operation: Operation },

    /// A native media event carrying a property snapshot.
    Media { event: MediaEventKind, props: MediaSnapshot },

    SeekingTime { time: f64 },
    EndSeeking { time: f64 },
    FullscreenChange { is_fullscreen: bool },
    PlayerActivate { activity: bool },
    UserActivate { activity: bool },
    PictureInPictureChange { is_picture_in_picture: bool },
    LoopChange {
        #[serde(rename = "loop")]
        looping: bool,
    },
    TheaterModeChange { is_theater: bool },
    QualityChange { quality: String },
    ActivateTextTrack { text_track: Option<TextTrack> },

    #[serde(other)]
    Unknown,
}

impl Transition {
    pub fn operate(operation: Operation) -> Self {
        Transition::Operate { operation }
    }

    pub fn media(event: MediaEventKind, props: MediaSnapshot) -> Self {
        Transition::Media { event, props }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Operate { .. } => "operate",
            Transition::Media { .. } => "media",
            Transition::SeekingTime { .. } => "seekingTime",
            Transition::EndSeeking { .. } => "endSeeking",
            Transition::FullscreenChange { .. } => "fullscreenChange",
            Transition::PlayerActivate { .. } => "playerActivate",
            Transition::UserActivate { .. } => "userActivate",
            Transition::PictureInPictureChange { .. } => "pictureInPictureChange",
            Transition::LoopChange { .. } => "loopChange",
            Transition::TheaterModeChange { .. } => "theaterModeChange",
            Transition::QualityChange { .. } => "qualityChange",
            Transition::ActivateTextTrack { .. } => "activateTextTrack",
            Transition::Unknown => "unknown",
        }
    }
}
