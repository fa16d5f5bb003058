//! In-memory stand-ins for the media element, the fullscreen shim and the
//! document, shared by the unit tests.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::listeners::{DocumentEvent, DocumentEventKind, DocumentHandler, EventTarget, ListenerId};
use crate::media::fullscreen::{FullscreenApi, FullscreenHandler, RootElement};
use crate::media::properties::read_common;
use crate::media::{CanPlay, MediaElement, MediaProperty, MediaValue, TextTrack, TextTrackKind, TextTrackMode, TrackId};
use crate::{Error, Result};

#[derive(Debug)]
struct MediaInner {
    paused: bool,
    current_time: f64,
    duration: f64,
    playback_rate: f64,
    muted: bool,
    volume: f64,
    reject_play: bool,
    play_calls: usize,
    pause_calls: usize,
    tracks: Vec<TextTrack>,
    next_track: u64,
}

pub struct FakeMedia {
    inner: Mutex<MediaInner>,
}

impl FakeMedia {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MediaInner {
                paused: true,
                current_time: 0.0,
                duration: 0.0,
                playback_rate: 1.0,
                muted: false,
                volume: 1.0,
                reject_play: false,
                play_calls: 0,
                pause_calls: 0,
                tracks: Vec::new(),
                next_track: 1,
            }),
        }
    }

    pub fn reject_play(&self, reject: bool) {
        self.inner.lock().reject_play = reject;
    }

    pub fn play_calls(&self) -> usize {
        self.inner.lock().play_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.inner.lock().pause_calls
    }

    pub fn set_duration(&self, duration: f64) {
        self.inner.lock().duration = duration;
    }

    /// Simulates playback reaching the end without pausing.
    pub fn set_playing(&self, playing: bool) {
        self.inner.lock().paused = !playing;
    }

    pub fn remove_text_track(&self, id: TrackId) {
        self.inner.lock().tracks.retain(|t| t.id != id);
    }
}

impl MediaElement for FakeMedia {
    fn play(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.play_calls += 1;
        if inner.reject_play {
            return Err(Error::Media("play() request was rejected".to_string()));
        }
        inner.paused = false;
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.pause_calls += 1;
        inner.paused = true;
        Ok(())
    }

    fn load(&self) {
        let mut inner = self.inner.lock();
        inner.current_time = 0.0;
        inner.paused = true;
    }

    fn add_text_track(&self, kind: TextTrackKind, label: Option<&str>, language: Option<&str>) -> TextTrack {
        let mut inner = self.inner.lock();
        let track = TextTrack {
            id: TrackId(inner.next_track),
            kind,
            label: label.unwrap_or_default().to_string(),
            language: language.unwrap_or_default().to_string(),
            mode: TextTrackMode::Disabled,
        };
        inner.next_track += 1;
        inner.tracks.push(track.clone());
        track
    }

    fn can_play_type(&self, mime_type: &str) -> CanPlay {
        if mime_type.starts_with("video/mp4") {
            CanPlay::Probably
        } else {
            CanPlay::No
        }
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().current_time
    }

    fn set_current_time(&self, time: f64) -> Result<()> {
        if !time.is_finite() {
            return Err(Error::Media(format!("invalid time {}", time)));
        }
        self.inner.lock().current_time = time.max(0.0);
        Ok(())
    }

    fn playback_rate(&self) -> f64 {
        self.inner.lock().playback_rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.inner.lock().playback_rate = rate;
    }

    fn muted(&self) -> bool {
        self.inner.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        self.inner.lock().muted = muted;
    }

    fn volume(&self) -> f64 {
        self.inner.lock().volume
    }

    fn set_volume(&self, volume: f64) {
        self.inner.lock().volume = volume;
    }

    fn video_width(&self) -> u32 {
        1920
    }

    fn video_height(&self) -> u32 {
        1080
    }

    fn paused(&self) -> bool {
        self.inner.lock().paused
    }

    fn text_tracks(&self) -> Vec<TextTrack> {
        self.inner.lock().tracks.clone()
    }

    fn set_text_track_mode(&self, id: TrackId, mode: TextTrackMode) {
        if let Some(track) = self.inner.lock().tracks.iter_mut().find(|t| t.id == id) {
            track.mode = mode;
        }
    }

    fn property(&self, property: MediaProperty) -> MediaValue {
        match property {
            MediaProperty::Duration => MediaValue::Number(self.inner.lock().duration),
            other => read_common(self, other),
        }
    }
}

#[derive(Default)]
struct FullscreenInner {
    is_fullscreen: bool,
    request_calls: usize,
    exit_calls: usize,
    listeners: Vec<(ListenerId, FullscreenHandler)>,
}

pub struct FakeFullscreen {
    enabled: bool,
    inner: Mutex<FullscreenInner>,
}

impl FakeFullscreen {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            inner: Mutex::new(FullscreenInner::default()),
        }
    }

    pub fn request_calls(&self) -> usize {
        self.inner.lock().request_calls
    }

    pub fn exit_calls(&self) -> usize {
        self.inner.lock().exit_calls
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    /// Notifies listeners that `element` changed fullscreen status.
    pub fn fire(&self, element: &RootElement) {
        let handlers: Vec<FullscreenHandler> = self.inner.lock().listeners.iter().map(|(_, h)| Arc::clone(h)).collect();
        for handler in handlers {
            handler(element);
        }
    }
}

impl FullscreenApi for FakeFullscreen {
    fn request(&self, _element: &RootElement) {
        let mut inner = self.inner.lock();
        inner.request_calls += 1;
        inner.is_fullscreen = true;
    }

    fn exit(&self) {
        let mut inner = self.inner.lock();
        inner.exit_calls += 1;
        inner.is_fullscreen = false;
    }

    fn is_fullscreen(&self) -> bool {
        self.inner.lock().is_fullscreen
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn add_listener(&self, handler: FullscreenHandler) -> ListenerId {
        let id = ListenerId::new();
        self.inner.lock().listeners.push((id, handler));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.inner.lock().listeners.retain(|(listener, _)| *listener != id);
    }
}

#[derive(Default)]
pub struct FakeDocument {
    listeners: Mutex<Vec<(ListenerId, DocumentEventKind, DocumentHandler)>>,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn listener_count_for(&self, kind: DocumentEventKind) -> usize {
        self.listeners.lock().iter().filter(|(_, k, _)| *k == kind).count()
    }

    pub fn dispatch(&self, event: &DocumentEvent) {
        let handlers: Vec<DocumentHandler> = self
            .listeners
            .lock()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind())
            .map(|(_, _, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }
}

impl EventTarget for FakeDocument {
    fn add_listener(&self, kind: DocumentEventKind, handler: DocumentHandler) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.lock().push((id, kind, handler));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.lock().retain(|(listener, _, _)| *listener != id);
    }
}
