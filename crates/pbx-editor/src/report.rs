//! Session reports
//!
//! Callers must never need to diff the file to learn what happened: the
//! report distinguishes "nothing needed to change" (every step already
//! present) from "changes applied" from "failed, original restored".

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use pbx_document::ObjectId;
use pbx_splice::Outcome;

/// Outcome of one planned mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    /// Edit kind tag
    pub kind: String,
    /// What the edit addressed (file name, setting key, identifier, ...)
    pub target: String,
    /// Applied or already-present
    pub outcome: Outcome,
    /// Identifier issued for a newly created object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<ObjectId>,
}

/// Final report from one editing session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// Path that was edited
    pub project: PathBuf,
    /// Backup artifact retained for recovery (absent only if the session
    /// never reached the backup step)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
    /// Per-step outcomes, in plan order, up to the failing step
    pub steps: Vec<StepReport>,
    /// Whether the session reached its terminal success state
    pub success: bool,
    /// Why the session rolled back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

impl SessionReport {
    /// Whether the session succeeded
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.success
    }

    /// Successful session in which no step changed the document
    #[must_use]
    pub fn all_already_present(&self) -> bool {
        self.success
            && !self.steps.is_empty()
            && self.steps.iter().all(|s| s.outcome == Outcome::AlreadyPresent)
    }

    /// Number of steps that changed the document
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == Outcome::Applied)
            .count()
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Edit Session Report ===\n\n");
        report.push_str(&format!("Project: {}\n", self.project.display()));
        if let Some(backup) = &self.backup {
            report.push_str(&format!("Backup: {}\n", backup.display()));
        }
        report.push_str(&format!("Steps: {}\n", self.steps.len()));
        report.push_str(&format!("Applied: {}\n", self.applied_count()));
        report.push_str(&format!(
            "Already Present: {}\n",
            self.steps.len() - self.applied_count()
        ));

        if !self.steps.is_empty() {
            report.push_str("\n=== Steps ===\n");
            for (i, step) in self.steps.iter().enumerate() {
                let outcome = match step.outcome {
                    Outcome::Applied => "applied",
                    Outcome::AlreadyPresent => "already present",
                };
                report.push_str(&format!(
                    "{}. {} {} ({outcome})",
                    i + 1,
                    step.kind,
                    step.target
                ));
                if let Some(id) = &step.identifier {
                    report.push_str(&format!(" -> {id}"));
                }
                report.push('\n');
            }
        }

        report.push('\n');
        if self.success {
            if self.all_already_present() {
                report.push_str("Status: NO CHANGES NEEDED\n");
            } else {
                report.push_str("Status: CHANGES APPLIED\n");
            }
        } else {
            report.push_str("Status: FAILED, ORIGINAL RESTORED\n");
            if let Some(reason) = &self.failure_reason {
                report.push_str(&format!("Reason: {reason}\n"));
            }
        }

        report
    }
}
