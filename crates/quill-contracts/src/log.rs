//! Log stream entry types.
//!
//! Entries are human-readable progress messages attributed to a persona.
//! The stream is append-only: entries are never edited after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::AgentName;

/// What kind of event an entry reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Warning,
    Error,
    Thought,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Warning => "warning",
            LogKind::Error => "error",
            LogKind::Thought => "thought",
        }
    }

    /// Severity used when mirroring the entry to diagnostic logging.
    pub fn level(&self) -> LogLevel {
        match self {
            LogKind::Thought => LogLevel::Debug,
            LogKind::Info | LogKind::Success => LogLevel::Info,
            LogKind::Warning => LogLevel::Warn,
            LogKind::Error => LogLevel::Error,
        }
    }
}

/// Severity of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One entry in the log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Monotonically increasing position in the stream, starting at 0.
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub agent_name: AgentName,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub level: LogLevel,
}
