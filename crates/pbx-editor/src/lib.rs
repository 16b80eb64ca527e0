//! PBX Editor
//!
//! The session layer over [`pbx_splice`]: one editing session takes a backup
//! of the target file, applies an ordered plan of idempotent edits in memory,
//! writes the result back once, and restores the original bytes if anything
//! fails along the way.
//!
//! # Session lifecycle
//!
//! ```rust,ignore
//! use pbx_editor::{cloudkit_plan, run_plan, CloudKitSpec};
//!
//! let plan = cloudkit_plan(&spec);
//! let report = run_plan(&project_path, &plan)?;
//!
//! if report.all_already_present() {
//!     // nothing needed to change
//! }
//! ```
//!
//! Exactly one session may run against one file at a time; the editor takes
//! no lock, so callers that might race must coordinate externally (e.g. a
//! lock file). The backup artifact is never deleted by the editor.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod orchestrator;
pub mod report;
pub mod snapshot;
pub mod state_machine;

pub use error::{SessionError, StateError};
pub use orchestrator::{cloudkit_plan, run_plan, CloudKitSpec};
pub use report::{SessionReport, StepReport};
pub use snapshot::SessionHandle;
pub use state_machine::SessionState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
