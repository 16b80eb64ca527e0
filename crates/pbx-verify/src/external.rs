//! Bounded-timeout external invocation
//!
//! The verifier may hand the edited project to an external build tool for a
//! semantic check. That invocation - not the editor - owns the timeout: the
//! child is polled and killed once the bound expires.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::VerifyError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One external command with its timeout bound
#[derive(Debug, Clone)]
pub struct ExternalCheck {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl ExternalCheck {
    /// Check with the given bound
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append an argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

/// How the external command concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalOutcome {
    /// Exited zero within the bound
    Passed,
    /// Exited non-zero within the bound
    Failed { status: Option<i32> },
    /// Killed at the bound
    TimedOut,
}

/// Run the command, polling until exit or timeout
///
/// # Errors
/// Returns [`VerifyError::Io`] if the command cannot be spawned or polled
pub fn run(check: &ExternalCheck) -> Result<ExternalOutcome, VerifyError> {
    tracing::info!(program = %check.program, timeout = ?check.timeout, "running external check");
    let mut child = Command::new(&check.program)
        .args(&check.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(if status.success() {
                ExternalOutcome::Passed
            } else {
                ExternalOutcome::Failed {
                    status: status.code(),
                }
            });
        }
        if started.elapsed() >= check.timeout {
            // Best effort; the child may exit on its own between polls.
            let _ = child.kill();
            let _ = child.wait();
            tracing::warn!(program = %check.program, "external check timed out");
            return Ok(ExternalOutcome::TimedOut);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
