use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::listeners::{ListenerGuard, ListenerId};

/// Opaque handle on the element a player renders into.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootElement(pub String);

impl RootElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RootElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Called with the element whose fullscreen status changed.
pub type FullscreenHandler = Arc<dyn Fn(&RootElement) + Send + Sync + 'static>;

/// Environment fullscreen capability (vendor-prefix shims live behind this).
pub trait FullscreenApi: Send + Sync {
    fn request(&self, element: &RootElement);
    fn exit(&self);
    fn is_fullscreen(&self) -> bool;
    fn enabled(&self) -> bool;
    fn add_listener(&self, handler: FullscreenHandler) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// Registers `handler` and returns a guard that removes it when dropped.
pub fn listen(api: &Arc<dyn FullscreenApi>, handler: FullscreenHandler) -> ListenerGuard {
    let id = api.add_listener(handler);
    let api = Arc::clone(api);
    ListenerGuard::new(id, move || api.remove_listener(id))
}

/// Fullscreen capability for environments without one. Toggling falls back
/// to a state-only flag flip.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedFullscreen;

impl FullscreenApi for UnsupportedFullscreen {
    fn request(&self, _element: &RootElement) {}

    fn exit(&self) {}

    fn is_fullscreen(&self) -> bool {
        false
    }

    fn enabled(&self) -> bool {
        false
    }

    fn add_listener(&self, _handler: FullscreenHandler) -> ListenerId {
        ListenerId::new()
    }

    fn remove_listener(&self, _id: ListenerId) {}
}
