//! PBX Document Model
//!
//! Data model leaves for the structural project-file editor.
//!
//! # Core Concepts
//!
//! - [`ObjectId`]: fixed-width opaque identifier keying an object in the document
//! - [`IdentifierPool`]: collision-hardened identifier issuance for one session
//! - [`ProjectDocument`]: the descriptor text with splice and search operations
//! - [`SectionKind`]: named object sections and their literal markers
//! - [`template`]: minimal valid project scaffold
//!
//! # Example
//!
//! ```rust,ignore
//! use pbx_document::{IdentifierPool, ProjectDocument};
//!
//! let doc = ProjectDocument::new(text);
//! let mut pool = IdentifierPool::scan(&doc);
//!
//! // Issued identifiers collide with nothing already in the document
//! let id = pool.issue();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod document;
mod ident;
mod section;

// Re-exports
pub use document::{DocumentError, ProjectDocument};
pub use ident::{IdentError, IdentifierPool, ObjectId};
pub use section::SectionKind;

/// Minimal-project scaffold
pub mod template;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
