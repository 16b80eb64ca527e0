//! PBX Splice
//!
//! Anchor location and idempotent mutation for project descriptors.
//!
//! # Core Concepts
//!
//! - [`anchor`]: locates textual insertion points from semantic target
//!   descriptions - regex over literal markers, degrading to depth-counted
//!   brace scanning wherever a region's extent depends on nesting
//! - [`scan`]: the balanced-brace scanner
//! - [`Edit`]: the four semantic edit kinds, each a precondition check
//!   followed by a minimal text splice
//! - [`Outcome`]: `Applied` vs `AlreadyPresent` (idempotent no-op)
//!
//! Mutators operate purely in memory; persisting the document and deciding
//! rollback belong to the session layer.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod anchor;
pub mod scan;

mod ops;

pub use anchor::{AnchorError, SettingsBody};
pub use ops::{Edit, EditResult, Outcome, SpliceError};
pub use scan::ScanError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
