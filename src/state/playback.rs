use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::transition::Transition;
use crate::media::{clamp_volume, MediaEventKind, MediaProperty, MediaSnapshot, MediaValue, TextTrack, TimeRange};

/// Marker recorded when the media element reports an error.
pub const UNKNOWN_ERROR: &str = "UNKNOWN ERROR";

/// Quality tag used when none has been chosen.
pub const DEFAULT_QUALITY: &str = "auto";

/// Mirror of the media element plus the player's own UI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub current_src: Option<String>,
    pub duration: f64,
    pub current_time: f64,
    /// Pointer position while dragging the seek bar; 0 otherwise.
    pub seeking_time: f64,
    pub buffered: Option<Vec<TimeRange>>,
    pub text_tracks: Option<Vec<TextTrack>>,
    pub waiting: bool,
    pub seeking: bool,
    pub paused: bool,
    pub auto_paused: bool,
    pub ended: bool,
    pub playback_rate: f64,
    pub muted: bool,
    /// Always within `[0, 1]`.
    pub volume: f64,
    pub ready_state: u16,
    pub network_state: u16,
    pub video_width: u32,
    pub video_height: u32,
    pub has_started: bool,
    pub user_activity: bool,
    pub is_active: bool,
    pub is_fullscreen: bool,
    pub is_picture_in_picture: bool,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub is_theater: bool,
    pub quality: String,
    pub active_text_track: Option<TextTrack>,
    pub error: Option<String>,
    /// Snapshot properties without a dedicated field (src, poster, ...).
    pub media_attributes: BTreeMap<MediaProperty, MediaValue>,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_src: None,
            duration: 0.0,
            current_time: 0.0,
            seeking_time: 0.0,
            buffered: None,
            text_tracks: None,
            waiting: false,
            seeking: false,
            paused: true,
            auto_paused: false,
            ended: false,
            playback_rate: 1.0,
            muted: false,
            volume: 1.0,
            ready_state: 0,
            network_state: 0,
            video_width: 0,
            video_height: 0,
            has_started: false,
            user_activity: true,
            is_active: false,
            is_fullscreen: false,
            is_picture_in_picture: false,
            looping: false,
            is_theater: false,
            quality: DEFAULT_QUALITY.to_string(),
            active_text_track: None,
            error: None,
            media_attributes: BTreeMap::new(),
        }
    }
}

impl PlaybackState {
    /// Shallow-merges a property snapshot into the state.
    ///
    /// Values whose shape does not fit the target field are skipped.
    pub fn merge_snapshot(&mut self, snapshot: &MediaSnapshot) {
        for (property, value) in snapshot.iter() {
            if !self.merge_property(property, value) {
                debug!("Skipping {} with unexpected value {:?}", property, value);
            }
        }
    }

    fn merge_property(&mut self, property: MediaProperty, value: &MediaValue) -> bool {
        use MediaProperty as P;
        use MediaValue as V;

        match (property, value) {
            (P::CurrentSrc, V::Text(src)) => self.current_src = Some(src.clone()),
            (P::CurrentSrc, V::Null) => self.current_src = None,
            (P::Duration, V::Number(n)) => self.duration = *n,
            (P::CurrentTime, V::Number(n)) => self.current_time = *n,
            (P::PlaybackRate, V::Number(n)) => self.playback_rate = *n,
            (P::Volume, V::Number(n)) => self.volume = clamp_volume(*n),
            (P::ReadyState, V::Number(n)) => self.ready_state = numeric_code(*n),
            (P::NetworkState, V::Number(n)) => self.network_state = numeric_code(*n),
            (P::VideoWidth, V::Number(n)) => self.video_width = dimension(*n),
            (P::VideoHeight, V::Number(n)) => self.video_height = dimension(*n),
            (P::Buffered, V::Ranges(ranges)) => self.buffered = Some(ranges.clone()),
            (P::Buffered, V::Null) => self.buffered = None,
            (P::TextTracks, V::Tracks(tracks)) => self.text_tracks = Some(tracks.clone()),
            (P::TextTracks, V::Null) => self.text_tracks = None,
            (P::Seeking, V::Bool(b)) => self.seeking = *b,
            (P::Paused, V::Bool(b)) => self.paused = *b,
            (P::Ended, V::Bool(b)) => self.ended = *b,
            (P::Muted, V::Bool(b)) => self.muted = *b,
            (P::Loop, V::Bool(b)) => self.looping = *b,
            (P::Error, V::Null) => self.error = None,
            (P::Error, V::Text(message)) | (P::Error, V::Error { message, .. }) => {
                self.error = Some(message.clone())
            }
            (
                P::CurrentSrc
                | P::Duration
                | P::CurrentTime
                | P::PlaybackRate
                | P::Volume
                | P::ReadyState
                | P::NetworkState
                | P::VideoWidth
                | P::VideoHeight
                | P::Buffered
                | P::TextTracks
                | P::Seeking
                | P::Paused
                | P::Ended
                | P::Muted
                | P::Loop
                | P::Error,
                _,
            ) => return false,
            (other, value) => {
                self.media_attributes.insert(other, value.clone());
            }
        }
        true
    }

    /// Time shown by progress widgets: the drag position while seeking.
    pub fn display_time(&self) -> f64 {
        if self.seeking_time != 0.0 {
            self.seeking_time
        } else {
            self.current_time
        }
    }
}

fn numeric_code(n: f64) -> u16 {
    if n.is_finite() && n >= 0.0 {
        n as u16
    } else {
        0
    }
}

fn dimension(n: f64) -> u32 {
    if n.is_finite() && n >= 0.0 {
        n as u32
    } else {
        0
    }
}

/// Reduces the playback slice. Transitions for other slices return `state` itself.
pub fn reduce(state: &Arc<PlaybackState>, transition: &Transition) -> Arc<PlaybackState> {
    match transition {
        Transition::Media { event, props } => update(state, |s| {
            s.merge_snapshot(props);
            apply_event_flags(s, *event);
        }),
        Transition::UserActivate { activity } => update(state, |s| s.user_activity = *activity),
        Transition::PlayerActivate { activity } => update(state, |s| s.is_active = *activity),
        Transition::FullscreenChange { is_fullscreen } => update(state, |s| s.is_fullscreen = *is_fullscreen),
        Transition::SeekingTime { time } => update(state, |s| s.seeking_time = *time),
        Transition::EndSeeking { .. } => update(state, |s| s.seeking_time = 0.0),
        Transition::ActivateTextTrack { text_track } => {
            update(state, |s| s.active_text_track = text_track.clone())
        }
        Transition::PictureInPictureChange { is_picture_in_picture } => {
            update(state, |s| s.is_picture_in_picture = *is_picture_in_picture)
        }
        Transition::LoopChange { looping } => update(state, |s| s.looping = *looping),
        Transition::TheaterModeChange { is_theater } => update(state, |s| s.is_theater = *is_theater),
        Transition::QualityChange { quality } => update(state, |s| {
            s.quality = if quality.is_empty() {
                DEFAULT_QUALITY.to_string()
            } else {
                quality.clone()
            };
        }),
        Transition::Operate { .. } | Transition::Unknown => Arc::clone(state),
    }
}

fn update(state: &Arc<PlaybackState>, apply: impl FnOnce(&mut PlaybackState)) -> Arc<PlaybackState> {
    let mut next = PlaybackState::clone(state);
    apply(&mut next);
    Arc::new(next)
}

fn apply_event_flags(state: &mut PlaybackState, event: MediaEventKind) {
    match event {
        MediaEventKind::LoadStart => {
            state.has_started = false;
            state.ended = false;
        }
        MediaEventKind::CanPlay | MediaEventKind::CanPlayThrough | MediaEventKind::Playing => {
            state.waiting = false;
        }
        MediaEventKind::Waiting => state.waiting = true,
        MediaEventKind::Play => {
            state.ended = false;
            state.paused = false;
            state.auto_paused = false;
            state.waiting = false;
            state.has_started = true;
        }
        MediaEventKind::Pause => state.paused = true,
        MediaEventKind::End => state.ended = true,
        MediaEventKind::Seeking => state.seeking = true,
        MediaEventKind::Seeked => state.seeking = false,
        MediaEventKind::Error => {
            state.error = Some(UNKNOWN_ERROR.to_string());
            state.ended = true;
        }
        MediaEventKind::DurationChange
        | MediaEventKind::TimeUpdate
        | MediaEventKind::VolumeChange
        | MediaEventKind::ProgressChange
        | MediaEventKind::RateChange
        | MediaEventKind::Suspend
        | MediaEventKind::Abort
        | MediaEventKind::Emptied
        | MediaEventKind::Stalled
        | MediaEventKind::LoadedMetadata
        | MediaEventKind::LoadedData
        | MediaEventKind::Resize => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{TextTrackKind, TextTrackMode, TrackId};
    use crate::state::Operation;

    fn initial() -> Arc<PlaybackState> {
        Arc::new(PlaybackState::default())
    }

    fn media(event: MediaEventKind) -> Transition {
        Transition::media(event, MediaSnapshot::new())
    }

    #[test]
    fn unknown_and_foreign_transitions_keep_the_reference() {
        let state = initial();
        assert!(Arc::ptr_eq(&reduce(&state, &Transition::Unknown), &state));
        let operate = Transition::operate(Operation::new("play"));
        assert!(Arc::ptr_eq(&reduce(&state, &operate), &state));
    }

    #[test]
    fn play_clears_end_and_pause_flags() {
        let mut start = PlaybackState::default();
        start.ended = true;
        start.waiting = true;
        start.auto_paused = true;
        let next = reduce(&Arc::new(start), &media(MediaEventKind::Play));
        assert!(!next.paused);
        assert!(!next.ended);
        assert!(!next.waiting);
        assert!(!next.auto_paused);
        assert!(next.has_started);
    }

    #[test]
    fn load_start_begins_a_new_cycle() {
        let started = reduce(&initial(), &media(MediaEventKind::Play));
        let ended = reduce(&started, &media(MediaEventKind::End));
        assert!(ended.has_started && ended.ended);
        let reloaded = reduce(&ended, &media(MediaEventKind::LoadStart));
        assert!(!reloaded.has_started);
        assert!(!reloaded.ended);
    }

    #[test]
    fn has_started_survives_pause_and_seek() {
        let mut state = reduce(&initial(), &media(MediaEventKind::Play));
        for event in [MediaEventKind::Pause, MediaEventKind::Seeking, MediaEventKind::Seeked, MediaEventKind::Waiting] {
            state = reduce(&state, &media(event));
            assert!(state.has_started, "lost hasStarted on {}", event);
        }
        assert!(state.paused);
        assert!(state.waiting);
        assert!(!state.seeking);
    }

    #[test]
    fn error_sets_marker_and_ends() {
        let props = MediaSnapshot::new().with(
            MediaProperty::Error,
            MediaValue::Error {
                code: 4,
                message: "MEDIA_ERR_SRC_NOT_SUPPORTED".to_string(),
            },
        );
        let next = reduce(&initial(), &Transition::media(MediaEventKind::Error, props));
        assert_eq!(next.error.as_deref(), Some(UNKNOWN_ERROR));
        assert!(next.ended);
    }

    #[test]
    fn snapshot_merge_clears_a_previous_error() {
        let failed = reduce(&initial(), &media(MediaEventKind::Error));
        let props = MediaSnapshot::new().with(MediaProperty::Error, MediaValue::Null);
        let recovered = reduce(&failed, &Transition::media(MediaEventKind::LoadStart, props));
        assert_eq!(recovered.error, None);
    }

    #[test]
    fn snapshot_values_land_in_typed_fields_and_attributes() {
        let props = MediaSnapshot::new()
            .with(MediaProperty::CurrentTime, 42.0)
            .with(MediaProperty::Duration, 300.0)
            .with(MediaProperty::Volume, 7.0)
            .with(MediaProperty::ReadyState, 4.0)
            .with(MediaProperty::Buffered, vec![TimeRange::new(0.0, 60.0)])
            .with(MediaProperty::Poster, "poster.jpg")
            .with(MediaProperty::Paused, "not a bool");
        let next = reduce(&initial(), &Transition::media(MediaEventKind::TimeUpdate, props));
        assert_eq!(next.current_time, 42.0);
        assert_eq!(next.duration, 300.0);
        assert_eq!(next.volume, 1.0);
        assert_eq!(next.ready_state, 4);
        assert_eq!(next.buffered.as_deref(), Some(&[TimeRange::new(0.0, 60.0)][..]));
        assert_eq!(next.media_attributes.get(&MediaProperty::Poster), Some(&MediaValue::from("poster.jpg")));
        assert!(next.paused);
    }

    #[test]
    fn seeking_time_is_reset_by_end_seeking() {
        let dragging = reduce(&initial(), &Transition::SeekingTime { time: 12.0 });
        assert_eq!(dragging.seeking_time, 12.0);
        assert_eq!(dragging.display_time(), 12.0);
        let released = reduce(&dragging, &Transition::EndSeeking { time: 12.0 });
        assert_eq!(released.seeking_time, 0.0);
    }

    #[test]
    fn empty_quality_falls_back_to_auto() {
        let hd = reduce(&initial(), &Transition::QualityChange { quality: "1080p".to_string() });
        assert_eq!(hd.quality, "1080p");
        let reset = reduce(&hd, &Transition::QualityChange { quality: String::new() });
        assert_eq!(reset.quality, DEFAULT_QUALITY);
    }

    #[test]
    fn ui_transitions_replace_only_their_field() {
        let state = initial();
        let next = reduce(&state, &Transition::TheaterModeChange { is_theater: true });
        assert!(next.is_theater);
        assert_eq!(PlaybackState { is_theater: false, ..(*next).clone() }, *state);

        let track = TextTrack {
            id: TrackId(3),
            kind: TextTrackKind::Captions,
            label: "English".to_string(),
            language: "en".to_string(),
            mode: TextTrackMode::Showing,
        };
        let next = reduce(&state, &Transition::ActivateTextTrack { text_track: Some(track.clone()) });
        assert_eq!(next.active_text_track, Some(track));
    }
}
