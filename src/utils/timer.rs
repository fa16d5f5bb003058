use log::warn;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A single pending "do this after a delay" task.
///
/// Restarting cancels the pending task, so at most one is ever queued.
/// Dropping the timer cancels it as well.
#[derive(Debug, Default)]
pub struct HideTimer {
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl HideTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending task and schedules `f` to run after `delay`.
    ///
    /// Needs a tokio runtime; without one nothing is scheduled.
    pub fn restart<F>(&self, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(task) = pending.take() {
            task.abort();
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("No async runtime, skipping timer: {}", e);
                return;
            }
        };

        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        }));
    }

    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.lock().as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for HideTimer {
    fn drop(&mut self) {
        if let Some(task) = self.pending.get_mut().take() {
            task.abort();
        }
    }
}
