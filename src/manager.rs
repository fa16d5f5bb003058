//! One player instance: its store, its media element and its environment.

use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::actions::{media, Actions};
use crate::compose::{self, Child, PlayerComposition, PlayerOptions};
use crate::config::PlayerConfig;
use crate::listeners::ListenerGuard;
use crate::media::{
    fullscreen, FullscreenApi, MediaElement, MediaEventKind, MediaHandle, NativeEvent, RootElement,
    UnsupportedFullscreen,
};
use crate::state::{OperationState, PlaybackState, RootState, Transition};
use crate::store::{Store, Subscription};
use crate::utils::{HideTimer, Throttle};
use crate::Result;

/// Owns the state of one player and wires the media element, the fullscreen
/// capability and user activity into it.
pub struct Manager {
    store: Store,
    media: MediaHandle,
    fullscreen: Arc<dyn FullscreenApi>,
    root: Arc<RwLock<Option<RootElement>>>,
    config: PlayerConfig,
    progress_throttle: Throttle,
    pointer_throttle: Throttle,
    controls_timer: HideTimer,
    controls_auto_hide: RwLock<Duration>,
    auto_hide_controls: RwLock<bool>,
    fullscreen_listener: Mutex<Option<ListenerGuard>>,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl Manager {
    /// Creates a manager for an environment without a fullscreen capability
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_fullscreen(config, Arc::new(UnsupportedFullscreen))
    }

    pub fn with_fullscreen(config: PlayerConfig, fullscreen: Arc<dyn FullscreenApi>) -> Self {
        let window = config.throttle_window();
        let controls_auto_hide = config.controls_auto_hide();
        let mut initial = RootState::default();
        if config.loop_playback {
            Arc::make_mut(&mut initial.player).looping = true;
        }

        Self {
            store: Store::with_state(initial),
            media: MediaHandle::new(),
            fullscreen,
            root: Arc::new(RwLock::new(None)),
            config,
            progress_throttle: Throttle::new(window),
            pointer_throttle: Throttle::new(window),
            controls_timer: HideTimer::new(),
            controls_auto_hide: RwLock::new(controls_auto_hide),
            auto_hide_controls: RwLock::new(true),
            fullscreen_listener: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn media(&self) -> &MediaHandle {
        &self.media
    }

    pub fn fullscreen_api(&self) -> Arc<dyn FullscreenApi> {
        Arc::clone(&self.fullscreen)
    }

    pub fn attach_media(&self, element: Arc<dyn MediaElement>) {
        info!("Attaching media element");
        self.media.attach(element);
        self.progress_throttle.reset();
    }

    pub fn detach_media(&self) -> Option<Arc<dyn MediaElement>> {
        info!("Detaching media element");
        self.media.detach()
    }

    pub fn set_root_element(&self, root: RootElement) {
        *self.root.write() = Some(root);
    }

    pub fn root_element(&self) -> Option<RootElement> {
        self.root.read().clone()
    }

    /// Starts listening for fullscreen changes of the root element.
    pub fn mount(&self) {
        let mut listener = self.fullscreen_listener.lock();
        if listener.is_some() {
            debug!("Manager already mounted");
            return;
        }

        let store = self.store.clone();
        let root = Arc::clone(&self.root);
        let api = Arc::downgrade(&self.fullscreen);
        let handler: fullscreen::FullscreenHandler = Arc::new(move |element: &RootElement| {
            if root.read().as_ref() != Some(element) {
                return;
            }
            if let Some(api) = api.upgrade() {
                store.dispatch(Transition::FullscreenChange {
                    is_fullscreen: api.is_fullscreen(),
                });
            }
        });
        *listener = Some(fullscreen::listen(&self.fullscreen, handler));
        debug!("Manager mounted");
    }

    /// Releases every listener and pending timer.
    pub fn unmount(&self) {
        if let Some(listener) = self.fullscreen_listener.lock().take() {
            listener.release();
        }
        self.controls_timer.cancel();
        debug!("Manager unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.fullscreen_listener.lock().is_some()
    }

    pub fn get_state(&self) -> Arc<RootState> {
        self.store.state()
    }

    pub fn dispatch(&self, transition: Transition) -> Arc<RootState> {
        self.store.dispatch(transition)
    }

    pub fn actions(&self) -> Actions<'_> {
        Actions::new(self)
    }

    /// Subscribes to a projection of the state; see [`Store::subscribe_projected`].
    pub fn subscribe_to_state_change<T, P, L>(&self, projector: P, listener: L) -> Subscription
    where
        T: ?Sized + Send + Sync + 'static,
        P: Fn(&Arc<RootState>) -> Arc<T> + Send + 'static,
        L: FnMut(&Arc<T>, &Arc<T>) + Send + 'static,
    {
        self.store.subscribe_projected(projector, listener)
    }

    pub fn subscribe_to_player_state_change<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(&Arc<PlaybackState>, &Arc<PlaybackState>) + Send + 'static,
    {
        self.store.subscribe_player(listener)
    }

    pub fn subscribe_to_operation_state_change<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(&Arc<OperationState>, &Arc<OperationState>) + Send + 'static,
    {
        self.store.subscribe_operation(listener)
    }

    /// Parses a native event name and handles it.
    pub fn handle_native_event_name(&self, name: &str) -> Result<Arc<RootState>> {
        let event: NativeEvent = name.parse()?;
        Ok(self.handle_native_event(event))
    }

    /// Reacts to an event fired by the media element.
    pub fn handle_native_event(&self, event: NativeEvent) -> Arc<RootState> {
        match event {
            NativeEvent::Media(kind) => self.handle_media_event(kind),
            NativeEvent::EnterPictureInPicture => self.dispatch(media::handle_picture_in_picture_change(true)),
            NativeEvent::LeavePictureInPicture => self.dispatch(media::handle_picture_in_picture_change(false)),
            NativeEvent::TextTrackAdded | NativeEvent::TextTrackRemoved => self.sync_active_text_track(),
        }
    }

    fn handle_media_event(&self, kind: MediaEventKind) -> Arc<RootState> {
        match kind {
            MediaEventKind::ProgressChange if !self.progress_throttle.ready() => {
                return self.get_state();
            }
            MediaEventKind::End => {
                let state = self.get_state();
                if self.config.loop_playback || state.player.looping {
                    self.media.seek(0.0);
                    self.media.play();
                } else if !state.player.paused {
                    self.media.pause();
                }
            }
            MediaEventKind::LoadedMetadata => {
                if let Some(start) = self.config.start_time.filter(|t| *t > 0.0) {
                    debug!("Applying start time {}", start);
                    self.media.seek(start);
                }
            }
            _ => {}
        }
        self.actions().capture(kind)
    }

    fn sync_active_text_track(&self) -> Arc<RootState> {
        let showing = self.media.text_tracks().into_iter().find(|t| t.is_showing());
        let state = self.get_state();
        if state.player.active_text_track == showing {
            return state;
        }
        self.dispatch(media::activate_text_track(showing))
    }

    /// Overrides the delay before idle controls hide.
    pub fn set_controls_auto_hide(&self, delay: Duration) {
        *self.controls_auto_hide.write() = delay;
    }

    pub fn controls_auto_hide(&self) -> Duration {
        *self.controls_auto_hide.read()
    }

    /// Turns idle hiding of the controls on or off. While off the user
    /// stays active after any activity.
    pub fn set_auto_hide_controls(&self, enabled: bool) {
        *self.auto_hide_controls.write() = enabled;
        if !enabled {
            self.controls_timer.cancel();
        }
    }

    pub fn auto_hide_controls(&self) -> bool {
        *self.auto_hide_controls.read()
    }

    /// Marks the user as active and restarts the idle timer that hides the
    /// controls again.
    pub fn start_controls_timer(&self) {
        self.actions().user_activate(true);
        if !self.auto_hide_controls() {
            return;
        }

        let store = self.store.clone();
        self.controls_timer.restart(self.controls_auto_hide(), move || {
            store.dispatch(Transition::UserActivate { activity: false });
        });
    }

    /// Pointer moves are throttled before they count as activity.
    pub fn handle_pointer_move(&self) {
        if self.pointer_throttle.ready() {
            self.start_controls_timer();
        }
    }

    pub fn handle_pointer_down(&self) {
        self.start_controls_timer();
    }

    pub fn handle_key_down(&self) {
        self.start_controls_timer();
    }

    pub fn handle_focus(&self) {
        self.actions().activate(true);
    }

    pub fn handle_blur(&self) {
        self.actions().activate(false);
    }

    /// Composes the player's children for a render pass.
    ///
    /// An idle delay set on a user-supplied control bar replaces the
    /// configured one; without one the configured delay is restored. A
    /// control bar with `autoHide: false` keeps the controls up.
    pub fn compose_children(
        &self,
        users: &[Child],
        shared: &Map<String, Value>,
        options: &PlayerOptions,
    ) -> PlayerComposition {
        let composition = compose::player::compose(users, shared, options, self.config.default_order);
        for ambiguity in &composition.outcome.ambiguities {
            debug!("Resolved ambiguous widget {} to {}", ambiguity.widget, ambiguity.chosen);
        }
        let delay = composition
            .controls_auto_hide
            .unwrap_or_else(|| self.config.controls_auto_hide());
        self.set_controls_auto_hide(delay);
        self.set_auto_hide_controls(composition.auto_hide_controls);
        composition
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        if self.fullscreen_listener.get_mut().is_some() {
            warn!("Manager dropped while mounted, releasing listeners");
        }
        self.unmount();
    }
}
