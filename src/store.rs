//! The per-player state container and its subscription layer.

use log::debug;
use parking_lot::{Mutex, ReentrantMutex};
use std::fmt;
use std::sync::{Arc, Weak};
use uuid::Uuid;

use crate::state::{self, OperationState, PlaybackState, RootState, Transition};

/// A unique identifier for a state subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Notify = dyn FnMut(&Arc<RootState>) + Send;

/// Internal subscriber
struct Subscriber {
    id: SubscriptionId,
    notify: Arc<Mutex<Box<Notify>>>,
}

struct StoreInner {
    state: Mutex<Arc<RootState>>,
    subscribers: Mutex<Vec<Subscriber>>,
    // Serializes dispatch + notification across threads; re-entrant so a
    // listener dispatching on its own thread does not deadlock.
    dispatch_lock: ReentrantMutex<()>,
}

/// State container for one player instance. Cloning shares the same store.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates a store holding the initial state
    pub fn new() -> Self {
        Self::with_state(RootState::default())
    }

    /// Creates a store seeded with `state`
    pub fn with_state(state: RootState) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(Arc::new(state)),
                subscribers: Mutex::new(Vec::new()),
                dispatch_lock: ReentrantMutex::new(()),
            }),
        }
    }

    /// Current state
    pub fn state(&self) -> Arc<RootState> {
        Arc::clone(&self.inner.state.lock())
    }

    /// Reduces `transition` into the state, then notifies subscribers in
    /// registration order. Returns the resulting state.
    ///
    /// A listener may dispatch from inside its own notification. The nested
    /// dispatch notifies every other subscriber at once; the dispatching
    /// subscriber is notified of the newer state as soon as its outer call
    /// returns. Each subscriber always receives the latest state, so none
    /// observes an older state after a newer one.
    pub fn dispatch(&self, transition: Transition) -> Arc<RootState> {
        let _serial = self.inner.dispatch_lock.lock();

        let (previous, next) = {
            let mut current = self.inner.state.lock();
            let previous = Arc::clone(&current);
            let next = state::reduce(&previous, &transition);
            *current = Arc::clone(&next);
            (previous, next)
        };

        if Arc::ptr_eq(&previous, &next) {
            debug!("Transition {} left the state unchanged", transition.name());
            return next;
        }
        debug!("Dispatched {}", transition.name());

        self.notify_subscribers();
        next
    }

    /// Notifies every subscriber of the latest state
    fn notify_subscribers(&self) {
        let subscribers: Vec<(SubscriptionId, Arc<Mutex<Box<Notify>>>)> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|s| (s.id, Arc::clone(&s.notify)))
            .collect();

        for (id, notify) in subscribers {
            if !self.is_subscribed(id) {
                // Removed by an earlier listener in this round
                continue;
            }
            let Some(mut notify) = notify.try_lock() else {
                debug!("Deferring re-entrant notification of subscriber {}", id);
                continue;
            };
            let mut delivered = self.state();
            loop {
                notify(&delivered);
                let latest = self.state();
                if Arc::ptr_eq(&latest, &delivered) || !self.is_subscribed(id) {
                    break;
                }
                delivered = latest;
            }
        }
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.inner.subscribers.lock().iter().any(|s| s.id == id)
    }

    /// Subscribes to a projection of the state.
    ///
    /// `listener(next, previous)` runs after an update only when
    /// `projector` returns a different `Arc` than it did last time.
    pub fn subscribe_projected<T, P, L>(&self, projector: P, mut listener: L) -> Subscription
    where
        T: ?Sized + Send + Sync + 'static,
        P: Fn(&Arc<RootState>) -> Arc<T> + Send + 'static,
        L: FnMut(&Arc<T>, &Arc<T>) + Send + 'static,
    {
        let mut previous = projector(&self.state());
        let notify: Box<Notify> = Box::new(move |state: &Arc<RootState>| {
            let next = projector(state);
            if Arc::ptr_eq(&next, &previous) {
                return;
            }
            let prev = std::mem::replace(&mut previous, Arc::clone(&next));
            listener(&next, &prev);
        });

        let id = SubscriptionId::new();
        self.inner.subscribers.lock().push(Subscriber {
            id,
            notify: Arc::new(Mutex::new(notify)),
        });
        debug!("Added state subscriber {}", id);

        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Subscribes to the whole state
    pub fn subscribe<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(&Arc<RootState>, &Arc<RootState>) + Send + 'static,
    {
        self.subscribe_projected(|state: &Arc<RootState>| Arc::clone(state), listener)
    }

    /// Subscribes to the playback slice
    pub fn subscribe_player<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(&Arc<PlaybackState>, &Arc<PlaybackState>) + Send + 'static,
    {
        self.subscribe_projected(|state: &Arc<RootState>| Arc::clone(&state.player), listener)
    }

    /// Subscribes to the operation slice
    pub fn subscribe_operation<L>(&self, listener: L) -> Subscription
    where
        L: FnMut(&Arc<OperationState>, &Arc<OperationState>) + Send + 'static,
    {
        self.subscribe_projected(|state: &Arc<RootState>| Arc::clone(&state.operation), listener)
    }

    /// Removes a subscriber. Returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        remove_subscriber(&self.inner, id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

fn remove_subscriber(inner: &StoreInner, id: SubscriptionId) -> bool {
    let mut subscribers = inner.subscribers.lock();
    let before = subscribers.len();
    subscribers.retain(|s| s.id != id);
    let removed = subscribers.len() != before;
    if removed {
        debug!("Removed state subscriber {}", id);
    }
    removed
}

/// A live subscription. Dropping it unsubscribes the listener.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: SubscriptionId,
    store: Weak<StoreInner>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribes now
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.store.upgrade() {
            remove_subscriber(&inner, self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaEventKind, MediaSnapshot};
    use crate::state::Operation;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, Arc<Mutex<Vec<T>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        (log.clone(), log)
    }

    #[test]
    fn slice_listener_ignores_other_slices() {
        let store = Store::new();
        let (calls, sink) = recorder::<u64>();
        let _sub = store.subscribe_operation(move |next, _| sink.lock().push(next.count));

        store.dispatch(Transition::FullscreenChange { is_fullscreen: true });
        store.dispatch(Transition::media(MediaEventKind::TimeUpdate, MediaSnapshot::new()));
        assert!(calls.lock().is_empty());

        store.dispatch(Transition::operate(Operation::new("play")));
        assert_eq!(*calls.lock(), vec![1]);
    }

    #[test]
    fn no_op_dispatch_notifies_nobody() {
        let store = Store::new();
        let (calls, sink) = recorder::<()>();
        let _sub = store.subscribe(move |_, _| sink.lock().push(()));
        let before = store.state();
        let after = store.dispatch(Transition::Unknown);
        assert!(Arc::ptr_eq(&before, &after));
        assert!(calls.lock().is_empty());
    }

    #[test]
    fn listener_receives_previous_projection() {
        let store = Store::new();
        let (calls, sink) = recorder::<(bool, bool)>();
        let _sub = store.subscribe_player(move |next, prev| sink.lock().push((prev.is_fullscreen, next.is_fullscreen)));
        store.dispatch(Transition::FullscreenChange { is_fullscreen: true });
        store.dispatch(Transition::FullscreenChange { is_fullscreen: false });
        assert_eq!(*calls.lock(), vec![(false, true), (true, false)]);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let store = Store::new();
        let (calls, first) = recorder::<&'static str>();
        let second = calls.clone();
        let _a = store.subscribe(move |_, _| first.lock().push("first"));
        let _b = store.subscribe_player(move |_, _| second.lock().push("second"));
        store.dispatch(Transition::UserActivate { activity: false });
        assert_eq!(*calls.lock(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one_listener() {
        let store = Store::new();
        let (calls, a) = recorder::<&'static str>();
        let b = calls.clone();
        let sub_a = store.subscribe_player(move |_, _| a.lock().push("a"));
        let _sub_b = store.subscribe_player(move |_, _| b.lock().push("b"));
        assert_eq!(store.subscriber_count(), 2);

        sub_a.unsubscribe();
        assert_eq!(store.subscriber_count(), 1);
        store.dispatch(Transition::PlayerActivate { activity: true });
        assert_eq!(*calls.lock(), vec!["b"]);
    }

    #[test]
    fn custom_projection_tracks_its_own_baseline() {
        let store = Store::new();
        let (calls, sink) = recorder::<String>();
        let _sub = store.subscribe_projected(
            |state: &Arc<RootState>| Arc::new(state.player.quality.clone()),
            move |next: &Arc<String>, _| sink.lock().push((**next).clone()),
        );
        store.dispatch(Transition::QualityChange { quality: "720p".to_string() });
        assert_eq!(*calls.lock(), vec!["720p".to_string()]);
    }

    #[test]
    fn re_entrant_dispatch_does_not_deadlock() {
        let store = Store::new();
        let inner = store.clone();
        let (calls, sink) = recorder::<bool>();
        let _sub = store.subscribe_player(move |next, _| {
            sink.lock().push(next.is_theater);
            if !next.is_theater {
                inner.dispatch(Transition::TheaterModeChange { is_theater: true });
            }
        });
        store.dispatch(Transition::UserActivate { activity: false });
        assert!(store.state().player.is_theater);
        assert_eq!(*calls.lock(), vec![false, true]);
    }

    #[test]
    fn later_subscribers_never_see_a_stale_state_after_a_nested_dispatch() {
        let store = Store::new();
        let inner = store.clone();
        let _first = store.subscribe_player(move |next, _| {
            if !next.is_theater {
                inner.dispatch(Transition::TheaterModeChange { is_theater: true });
            }
        });
        let (calls, sink) = recorder::<(bool, bool)>();
        let _second = store.subscribe_player(move |next, prev| {
            sink.lock().push((prev.is_theater, next.is_theater));
        });

        store.dispatch(Transition::UserActivate { activity: false });
        assert_eq!(*calls.lock(), vec![(false, true)]);
    }
}
