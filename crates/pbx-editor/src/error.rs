//! Session-level error taxonomy
//!
//! `AlreadyPresent` is deliberately absent: it is a successful outcome
//! recorded in the report, never an error.

use std::path::PathBuf;

use pbx_splice::SpliceError;

/// Errors that end an editing session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Target file missing at session start; no backup created, nothing
    /// mutated
    #[error("project file not found: {0}")]
    NotFound(PathBuf),

    /// A mutator's required anchor was absent or malformed
    #[error(transparent)]
    Splice(#[from] SpliceError),

    /// Filesystem failure at the read/write/copy boundary
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Illegal session state transition
    #[error(transparent)]
    State(#[from] StateError),
}

/// Errors from the session state machine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Transition not in the allowed table
    #[error("illegal session state transition")]
    IllegalTransition,
}
