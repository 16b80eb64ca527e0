//! Idempotent mutators
//!
//! One operation per semantic edit kind. Each is a precondition check ("is
//! this already present?") followed by a minimal text splice if not; a
//! repeated application is a successful no-op. Mutators never touch the
//! filesystem and never attempt recovery - anchor failures propagate to the
//! session layer, the sole rollback decision point.

mod build_setting;
mod capability;
mod file_reference;
mod target_attributes;

use indexmap::IndexMap;

use pbx_document::{DocumentError, IdentifierPool, ObjectId, ProjectDocument};

use crate::anchor::AnchorError;

/// What applying a mutator did
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The document was changed
    Applied,
    /// The edit was already in effect; the document is untouched
    AlreadyPresent,
}

/// Result of one mutator application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    /// Applied or already-present no-op
    pub outcome: Outcome,
    /// Identifier issued for a newly created object, when the edit creates one
    pub identifier: Option<ObjectId>,
}

impl EditResult {
    pub(crate) fn applied(identifier: Option<ObjectId>) -> Self {
        Self {
            outcome: Outcome::Applied,
            identifier,
        }
    }

    pub(crate) fn already_present() -> Self {
        Self {
            outcome: Outcome::AlreadyPresent,
            identifier: None,
        }
    }
}

/// Errors from applying a mutator
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    /// A required anchor is absent or its brace structure is malformed
    #[error(transparent)]
    Anchor(#[from] AnchorError),

    /// A splice offset fell outside the document
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// One semantic edit against a project document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Register a file on disk: a new file-reference object plus an entry in
    /// the named group's ordered children list
    AddFileReference {
        file_name: String,
        file_type: String,
        group: String,
    },

    /// Add `key = value;` to every build-settings body that carries the
    /// anchor key, immediately before the anchor
    AddBuildSetting {
        key: String,
        value: String,
        anchor_key: String,
    },

    /// Ensure the target's attribute body exists and carries the given
    /// settings, merging in only missing keys
    AddTargetAttributes {
        target: ObjectId,
        settings: IndexMap<String, String>,
    },

    /// Enable a named capability for the target
    AddCapability {
        target: ObjectId,
        capability: String,
    },
}

impl Edit {
    /// Stable kind tag for reports
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddFileReference { .. } => "add-file-reference",
            Self::AddBuildSetting { .. } => "add-build-setting",
            Self::AddTargetAttributes { .. } => "add-target-attributes",
            Self::AddCapability { .. } => "add-capability",
        }
    }

    /// Human-readable edit target for reports
    #[must_use]
    pub fn target(&self) -> String {
        match self {
            Self::AddFileReference { file_name, .. } => file_name.clone(),
            Self::AddBuildSetting { key, .. } => key.clone(),
            Self::AddTargetAttributes { target, .. } => target.to_string(),
            Self::AddCapability { capability, .. } => capability.clone(),
        }
    }

    /// Apply this edit to the in-memory document
    ///
    /// # Errors
    /// Returns error when a required anchor is absent; the document may have
    /// been partially modified by an earlier splice of the same edit only if
    /// the error came from a later splice - callers treat any error as fatal
    /// to the session and restore from backup.
    pub fn apply(
        &self,
        document: &mut ProjectDocument,
        pool: &mut IdentifierPool,
    ) -> Result<EditResult, SpliceError> {
        match self {
            Self::AddFileReference {
                file_name,
                file_type,
                group,
            } => file_reference::apply(document, pool, file_name, file_type, group),
            Self::AddBuildSetting {
                key,
                value,
                anchor_key,
            } => build_setting::apply(document, key, value, anchor_key),
            Self::AddTargetAttributes { target, settings } => {
                target_attributes::apply(document, target, settings)
            }
            Self::AddCapability { target, capability } => {
                capability::apply(document, target, capability)
            }
        }
    }
}
