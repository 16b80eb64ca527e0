//! PBX Verify
//!
//! The verifier collaborator: re-opens a project file after an editing
//! session and asserts expected substrings and structures exist. It makes no
//! guarantee about build correctness - only about the textual structural
//! validity of the session's edits. An optional external command (e.g. a
//! build tool) can be invoked with a bounded timeout via [`external`].

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pbx_document::ProjectDocument;

pub mod external;

/// How one assertion inspects the document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Literal substring must be present
    Contains(String),
    /// Pattern must match (compiled per evaluation; prefix `(?s)` for
    /// dot-matches-newline structure probes)
    Matches(String),
    /// `{` and `}` counts must agree
    BraceBalanced,
}

/// A named check over the re-opened document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    pub name: String,
    pub check: Check,
}

impl Assertion {
    /// Substring assertion
    #[must_use]
    pub fn contains(name: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check: Check::Contains(literal.into()),
        }
    }

    /// Pattern assertion
    #[must_use]
    pub fn matches(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check: Check::Matches(pattern.into()),
        }
    }

    /// Brace balance assertion
    #[must_use]
    pub fn brace_balanced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            check: Check::BraceBalanced,
        }
    }
}

/// Pass/fail for one assertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    pub name: String,
    pub passed: bool,
}

/// Report from one verification run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// File that was inspected
    pub project: PathBuf,
    /// Per-assertion outcomes, in input order
    pub results: Vec<AssertionResult>,
}

impl VerifyReport {
    /// Whether every assertion passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Number of passing assertions
    #[must_use]
    pub fn pass_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Number of failing assertions
    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.results.len() - self.pass_count()
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Verification Report ===\n\n");
        report.push_str(&format!("Project: {}\n\n", self.project.display()));
        for result in &self.results {
            let status = if result.passed { "PASS" } else { "FAIL" };
            report.push_str(&format!("{status} - {}\n", result.name));
        }
        report.push_str(&format!(
            "\nResults: {}/{} assertions passed\n",
            self.pass_count(),
            self.results.len()
        ));

        report
    }
}

/// Errors from verification
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// File to inspect is missing
    #[error("project file not found: {0}")]
    NotFound(PathBuf),

    /// Read failure
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// A `Matches` assertion carries an invalid pattern
    #[error("invalid assertion pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Re-open `path` and evaluate every assertion
///
/// # Errors
/// Returns error if the file is missing or unreadable, or an assertion
/// pattern does not compile; individual assertion failures are outcomes,
/// not errors
pub fn verify_file(path: &Path, assertions: &[Assertion]) -> Result<VerifyReport, VerifyError> {
    if !path.is_file() {
        return Err(VerifyError::NotFound(path.to_path_buf()));
    }
    let document = ProjectDocument::new(fs::read_to_string(path)?);

    let mut results = Vec::with_capacity(assertions.len());
    for assertion in assertions {
        let passed = evaluate(&document, &assertion.check)?;
        tracing::debug!(assertion = %assertion.name, passed, "evaluated");
        results.push(AssertionResult {
            name: assertion.name.clone(),
            passed,
        });
    }

    Ok(VerifyReport {
        project: path.to_path_buf(),
        results,
    })
}

fn evaluate(document: &ProjectDocument, check: &Check) -> Result<bool, VerifyError> {
    match check {
        Check::Contains(literal) => Ok(document.contains(literal)),
        Check::Matches(pattern) => {
            let re = regex::Regex::new(pattern).map_err(|source| VerifyError::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            Ok(re.is_match(document.as_str()))
        }
        Check::BraceBalanced => Ok(document.is_brace_balanced()),
    }
}

/// The stock assertion set for the entitlements-and-capability plan
#[must_use]
pub fn standard_assertions(entitlements_file: &str) -> Vec<Assertion> {
    vec![
        Assertion::contains("entitlements reference", entitlements_file),
        Assertion::contains("code sign entitlements", "CODE_SIGN_ENTITLEMENTS"),
        Assertion::contains("target attributes section", "TargetAttributes"),
        Assertion::contains("system capabilities", "SystemCapabilities"),
        Assertion::contains("icloud capability", "com.apple.iCloud"),
        Assertion::contains("cloudkit capability", "com.apple.CloudKit"),
        Assertion::contains("capability enabled", "enabled = 1"),
        Assertion::matches(
            "capability structure",
            r"(?s)SystemCapabilities\s*=\s*\{.*com\.apple\.(iCloud|CloudKit).*enabled\s*=\s*1",
        ),
        Assertion::brace_balanced("brace balance"),
    ]
}
