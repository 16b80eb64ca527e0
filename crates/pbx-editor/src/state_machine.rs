use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// States of one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    BackedUp,
    Mutating,
    Verified,
    RolledBack,
}

/// Validates a session state transition.
///
/// Illegal transitions indicate an orchestrator bug. To support testing
/// error handling they return an error; the debug panic can be enabled with
/// the `strict-debug` feature.
pub fn validate_transition(from: SessionState, to: SessionState) -> Result<(), StateError> {
    if allowed(from, to) {
        return Ok(());
    }

    #[cfg(feature = "strict-debug")]
    panic!("Illegal session state transition attempted: {from:?} -> {to:?}");

    #[cfg(not(feature = "strict-debug"))]
    Err(StateError::IllegalTransition)
}

pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        Idle => vec![BackedUp],
        BackedUp => vec![Mutating, RolledBack],
        Mutating => vec![Verified, RolledBack],
        Verified => vec![],
        RolledBack => vec![],
    }
}

fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}
