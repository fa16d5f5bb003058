//! Player state: two independently reduced slices behind one root.

use serde::Serialize;
use std::sync::Arc;

pub mod operation;
pub mod playback;
pub mod transition;

pub use operation::OperationState;
pub use playback::{PlaybackState, DEFAULT_QUALITY, UNKNOWN_ERROR};
pub use transition::{Operation, Transition};

/// The whole state of one player instance.
///
/// Slices are shared behind `Arc` so that an unchanged slice keeps its
/// reference across updates; subscribers compare by pointer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootState {
    pub player: Arc<PlaybackState>,
    pub operation: Arc<OperationState>,
}

/// Runs both slice reducers. Returns `state` itself when neither slice changed.
pub fn reduce(state: &Arc<RootState>, transition: &Transition) -> Arc<RootState> {
    let player = playback::reduce(&state.player, transition);
    let operation = operation::reduce(&state.operation, transition);

    if Arc::ptr_eq(&player, &state.player) && Arc::ptr_eq(&operation, &state.operation) {
        return Arc::clone(state);
    }

    Arc::new(RootState { player, operation })
}
