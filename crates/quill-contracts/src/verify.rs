//! Output verification report types.
//!
//! Generated payloads may be checked before they touch the project. Only a
//! passing `VerificationReport` lets the engine apply them.

use serde::{Deserialize, Serialize};

/// The result of checking one generated payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every check passed.
    pub passed: bool,
    /// All failures collected during this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    pub fn pass() -> Self {
        Self { passed: true, failures: Vec::new() }
    }

    /// Build a report from collected failures; passes when there are none.
    pub fn from_failures(failures: Vec<VerificationFailure>) -> Self {
        Self { passed: failures.is_empty(), failures }
    }

    /// One-line summary of every failure, `"[rule] message; ..."`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("[{}] {}", f.rule_id, f.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub rule_id: String,
    pub message: String,
}
