//! Document-level event listeners and their scoped registration.
//!
//! Widgets that react to keys or pointer drags outside their own bounds
//! register on the document while active. Every registration is held by a
//! [`ListenerGuard`] so it is released on every exit path, including drop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(Uuid);

impl ListenerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Keys the player and its sliders react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Space,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Char(char),
    Digit(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentEventKind {
    KeyDown,
    PointerMove,
    PointerUp,
}

/// An event delivered to document listeners. Pointer positions are already
/// resolved to a fraction of the receiving slider's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DocumentEvent {
    KeyDown(Key),
    PointerMove { fraction: f64 },
    PointerUp { fraction: f64 },
}

impl DocumentEvent {
    pub fn kind(&self) -> DocumentEventKind {
        match self {
            DocumentEvent::KeyDown(_) => DocumentEventKind::KeyDown,
            DocumentEvent::PointerMove { .. } => DocumentEventKind::PointerMove,
            DocumentEvent::PointerUp { .. } => DocumentEventKind::PointerUp,
        }
    }
}

pub type DocumentHandler = Arc<dyn Fn(&DocumentEvent) + Send + Sync + 'static>;

/// The document the player lives in.
pub trait EventTarget: Send + Sync {
    fn add_listener(&self, kind: DocumentEventKind, handler: DocumentHandler) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// Registers `handler` on `target` for `kind` and returns the owning guard.
pub fn attach(target: &Arc<dyn EventTarget>, kind: DocumentEventKind, handler: DocumentHandler) -> ListenerGuard {
    let id = target.add_listener(kind, handler);
    let target = Arc::clone(target);
    ListenerGuard::new(id, move || target.remove_listener(id))
}

/// Owns one listener registration and removes it exactly once.
pub struct ListenerGuard {
    id: ListenerId,
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl ListenerGuard {
    pub fn new(id: ListenerId, release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            id,
            release: Some(Box::new(release)),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Removes the listener now instead of at drop.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard").field("id", &self.id).finish()
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        self.run_release();
    }
}
