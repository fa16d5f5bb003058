use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::manager::Manager;
use crate::state::Operation;
use crate::store::Subscription;
use crate::utils::HideTimer;

/// Operations from this source flash the bezel.
pub const SHORTCUT_SOURCE: &str = "shortcut";

/// What the bezel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BezelView {
    pub hidden: bool,
    pub operation: Operation,
    pub count: u64,
}

impl Default for BezelView {
    fn default() -> Self {
        Self {
            hidden: true,
            operation: Operation::default(),
            count: 0,
        }
    }
}

impl BezelView {
    pub fn is_visible(&self) -> bool {
        !self.hidden && self.operation.source == SHORTCUT_SOURCE
    }

    /// Alternates on every operation so back-to-back identical operations
    /// restart the animation.
    pub fn animation_class(&self) -> &'static str {
        if self.count % 2 == 0 {
            "bezel-animation"
        } else {
            "bezel-animation-alt"
        }
    }

    pub fn icon_class(&self) -> String {
        format!("bezel-icon-{}", self.operation.action)
    }
}

/// Transient feedback for keyboard operations.
pub struct Bezel {
    view: Arc<Mutex<BezelView>>,
    timer: Arc<HideTimer>,
    _subscription: Subscription,
}

impl Bezel {
    pub fn mount(manager: &Manager) -> Self {
        let view = Arc::new(Mutex::new(BezelView::default()));
        let timer = Arc::new(HideTimer::new());
        let delay = manager.config().bezel_hide();

        let subscription = manager.subscribe_to_operation_state_change({
            let view = Arc::clone(&view);
            let timer = Arc::clone(&timer);
            move |next, previous| {
                if next.count == previous.count || next.operation.source != SHORTCUT_SOURCE {
                    return;
                }
                *view.lock() = BezelView {
                    hidden: false,
                    operation: next.operation.clone(),
                    count: next.count,
                };
                schedule_hide(&timer, &view, delay);
            }
        });

        Self {
            view,
            timer,
            _subscription: subscription,
        }
    }

    pub fn view(&self) -> BezelView {
        self.view.lock().clone()
    }

    pub fn is_hide_pending(&self) -> bool {
        self.timer.is_pending()
    }
}

fn schedule_hide(timer: &HideTimer, view: &Arc<Mutex<BezelView>>, delay: Duration) {
    let view = Arc::clone(view);
    timer.restart(delay, move || view.lock().hidden = true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;

    #[tokio::test(start_paused = true)]
    async fn shows_shortcut_operations_then_hides() {
        let manager = Manager::new(PlayerConfig::default());
        let bezel = Bezel::mount(&manager);
        assert!(!bezel.view().is_visible());

        manager.actions().toggle_play(Some(Operation::with_source("play", SHORTCUT_SOURCE)));
        let view = bezel.view();
        assert!(view.is_visible());
        assert_eq!(view.count, 1);
        assert_eq!(view.animation_class(), "bezel-animation-alt");
        assert_eq!(view.icon_class(), "bezel-icon-play");

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(bezel.view().is_visible());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!bezel.view().is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn a_new_operation_restarts_the_hide_delay() {
        let manager = Manager::new(PlayerConfig::default());
        let bezel = Bezel::mount(&manager);
        let op = || Some(Operation::with_source("forward-5", SHORTCUT_SOURCE));

        manager.actions().forward(5.0, op());
        tokio::time::sleep(Duration::from_millis(400)).await;
        manager.actions().forward(5.0, op());
        assert_eq!(bezel.view().animation_class(), "bezel-animation");
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(bezel.view().is_visible());
        tokio::time::sleep(Duration::from_millis(101)).await;
        assert!(!bezel.view().is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn ignores_operations_from_other_sources() {
        let manager = Manager::new(PlayerConfig::default());
        let bezel = Bezel::mount(&manager);
        manager.actions().play(None);
        manager.actions().take_screenshot();
        assert!(!bezel.view().is_visible());
        assert!(!bezel.is_hide_pending());
    }

    #[test]
    fn unmounting_unsubscribes() {
        let manager = Manager::new(PlayerConfig::default());
        let before = manager.store().subscriber_count();
        let bezel = Bezel::mount(&manager);
        assert_eq!(manager.store().subscriber_count(), before + 1);
        drop(bezel);
        assert_eq!(manager.store().subscriber_count(), before);
    }
}
