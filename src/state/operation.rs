use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::transition::{Operation, Transition};

/// The last operation plus a counter bumped by every operation.
///
/// Widgets alternate animation classes on the counter's parity so that two
/// identical operations in a row still restart the animation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationState {
    pub count: u64,
    pub operation: Operation,
}

impl OperationState {
    pub fn is_even(&self) -> bool {
        self.count % 2 == 0
    }
}

/// Reduces the operation slice. Only `Operate` changes it.
pub fn reduce(state: &Arc<OperationState>, transition: &Transition) -> Arc<OperationState> {
    match transition {
        Transition::Operate { operation } => Arc::new(OperationState {
            count: state.count + 1,
            operation: operation.clone(),
        }),
        _ => Arc::clone(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_operate_bumps_the_counter_once() {
        let mut state = Arc::new(OperationState::default());
        for _ in 0..5 {
            state = reduce(&state, &Transition::operate(Operation::new("play")));
        }
        assert_eq!(state.count, 5);
        assert_eq!(state.operation.action, "play");
        assert!(!state.is_even());
    }

    #[test]
    fn other_transitions_keep_the_reference() {
        let state = Arc::new(OperationState::default());
        let next = reduce(&state, &Transition::FullscreenChange { is_fullscreen: true });
        assert!(Arc::ptr_eq(&state, &next));
        assert!(Arc::ptr_eq(&state, &reduce(&state, &Transition::Unknown)));
    }

    #[test]
    fn operation_fields_are_replaced() {
        let state = Arc::new(OperationState::default());
        let next = reduce(&state, &Transition::operate(Operation::with_source("mute", "shortcut")));
        assert_eq!(next.operation, Operation::with_source("mute", "shortcut"));
        let next = reduce(&next, &Transition::operate(Operation::new("seek")));
        assert_eq!(next.operation.source, "");
        assert_eq!(next.count, 2);
    }
}
