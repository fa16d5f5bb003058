use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Leading-edge throttle: the first call in a window runs, the rest of the
/// window is dropped.
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    last_run: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_run: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns whether a call made now may run, and records it if so.
    pub fn ready(&self) -> bool {
        self.ready_at(Instant::now())
    }

    pub fn ready_at(&self, now: Instant) -> bool {
        let mut last_run = self.last_run.lock();
        match *last_run {
            Some(last) if now.saturating_duration_since(last) < self.window => false,
            _ => {
                *last_run = Some(now);
                true
            }
        }
    }

    /// Runs `f` if the window allows it.
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.ready().then(f)
    }

    pub fn reset(&self) {
        *self.last_run.lock() = None;
    }
}
