use std::io;
use thiserror::Error;

pub mod actions;
pub mod compose;
pub mod config;
pub mod listeners;
pub mod manager;
pub mod media;
pub mod state;
pub mod store;
pub mod utils;
pub mod widgets;

#[cfg(test)]
pub(crate) mod test_utils;

/// Error type for the neatflix-controls library
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Initializes logging for the library.
pub fn setup_logging() {
    env_logger::init();
}

/// Returns the version of the library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use actions::{ActionContext, Actions};
pub use compose::{Child, ComponentType, ElementType, MergeOutcome, WidgetDescriptor};
pub use config::PlayerConfig;
pub use manager::Manager;
pub use media::{MediaElement, MediaHandle, MediaSnapshot};
pub use state::{Operation, OperationState, PlaybackState, RootState, Transition};
pub use store::{Store, Subscription, SubscriptionId};
