//! The edit orchestrator
//!
//! Sequences a fixed plan of mutations against one target file:
//! `Idle -> BackedUp -> Mutating -> Verified | RolledBack`. The orchestrator
//! is the sole point that decides to roll back; mutators never attempt
//! recovery themselves.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use pbx_document::{IdentifierPool, ObjectId, ProjectDocument};
use pbx_splice::Edit;

use crate::error::SessionError;
use crate::report::{SessionReport, StepReport};
use crate::snapshot::{self, SessionHandle};
use crate::state_machine::{validate_transition, SessionState};

/// Parameters of the stock entitlements-and-capability plan
#[derive(Debug, Clone)]
pub struct CloudKitSpec {
    /// Application group name (also the directory prefix of the
    /// entitlements path in build settings)
    pub app_name: String,
    /// Native target whose attributes receive the capabilities
    pub target: ObjectId,
    /// Entitlements file name to register
    pub entitlements_file: String,
    /// Bundle identifier anchoring the build-settings bodies
    pub bundle_identifier: String,
    /// Development team merged into the target attributes
    pub development_team: Option<String>,
}

/// The fixed plan the original capability setup performs: register the
/// entitlements file, point code signing at it, ensure target attributes,
/// and enable the iCloud and CloudKit capabilities.
#[must_use]
pub fn cloudkit_plan(spec: &CloudKitSpec) -> Vec<Edit> {
    let mut settings = IndexMap::new();
    settings.insert("CreatedOnToolsVersion".to_string(), "15.0".to_string());
    if let Some(team) = &spec.development_team {
        settings.insert("DevelopmentTeam".to_string(), team.clone());
    }

    vec![
        Edit::AddFileReference {
            file_name: spec.entitlements_file.clone(),
            file_type: "text.plist.entitlements".to_string(),
            group: spec.app_name.clone(),
        },
        Edit::AddBuildSetting {
            key: "CODE_SIGN_ENTITLEMENTS".to_string(),
            value: format!("{}/{}", spec.app_name, spec.entitlements_file),
            anchor_key: format!("PRODUCT_BUNDLE_IDENTIFIER = {};", spec.bundle_identifier),
        },
        Edit::AddTargetAttributes {
            target: spec.target,
            settings,
        },
        Edit::AddCapability {
            target: spec.target,
            capability: "com.apple.iCloud".to_string(),
        },
        Edit::AddCapability {
            target: spec.target,
            capability: "com.apple.CloudKit".to_string(),
        },
    ]
}

/// Run an ordered edit plan against the file at `path`
///
/// On success the mutated document is written back once and the report
/// carries per-step outcomes. On any failure after the backup exists, the
/// original bytes are restored and the report says so - the returned `Ok`
/// still distinguishes the rolled-back session via `success = false`.
///
/// # Errors
/// Returns [`SessionError::NotFound`] if the file is missing (no backup is
/// created), or [`SessionError::Io`] if the backup or restore copy itself
/// fails
pub fn run_plan(path: &Path, plan: &[Edit]) -> Result<SessionReport, SessionError> {
    let mut state = SessionState::Idle;

    let handle = snapshot::begin_session(path)?;
    state = advance(state, SessionState::BackedUp)?;

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return roll_back(state, handle, Vec::new(), e.to_string()),
    };

    state = advance(state, SessionState::Mutating)?;
    tracing::info!(project = %path.display(), steps = plan.len(), "applying edit plan");

    let mut document = ProjectDocument::new(text);
    let mut pool = IdentifierPool::scan(&document);
    let mut steps = Vec::with_capacity(plan.len());

    for edit in plan {
        tracing::debug!(kind = edit.kind(), target = %edit.target(), "applying edit");
        match edit.apply(&mut document, &mut pool) {
            Ok(result) => steps.push(StepReport {
                kind: edit.kind().to_string(),
                target: edit.target(),
                outcome: result.outcome,
                identifier: result.identifier,
            }),
            Err(e) => {
                tracing::error!(kind = edit.kind(), error = %e, "edit failed");
                return roll_back(state, handle, steps, e.to_string());
            }
        }
    }

    // Structural invariant; a violation here is a mutator bug.
    if !document.is_brace_balanced() {
        return roll_back(state, handle, steps, "brace balance violated".to_string());
    }

    if let Err(e) = fs::write(path, document.as_str()) {
        return roll_back(state, handle, steps, e.to_string());
    }

    advance(state, SessionState::Verified)?;
    let backup = snapshot::commit(handle);
    tracing::info!(project = %path.display(), "edit plan complete");

    Ok(SessionReport {
        project: path.to_path_buf(),
        backup: Some(backup),
        steps,
        success: true,
        failure_reason: None,
    })
}

fn advance(from: SessionState, to: SessionState) -> Result<SessionState, SessionError> {
    validate_transition(from, to)?;
    Ok(to)
}

fn roll_back(
    state: SessionState,
    handle: SessionHandle,
    steps: Vec<StepReport>,
    reason: String,
) -> Result<SessionReport, SessionError> {
    validate_transition(state, SessionState::RolledBack)?;
    snapshot::rollback(&handle)?;
    Ok(SessionReport {
        project: handle.original_path().to_path_buf(),
        backup: Some(handle.backup_path().to_path_buf()),
        steps,
        success: false,
        failure_reason: Some(reason),
    })
}
