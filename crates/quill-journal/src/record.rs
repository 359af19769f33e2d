//! Journal record and export types.
//!
//! `JournalRecord` wraps a `LogEntry` with the SHA-256 hashes that make an
//! edit detectable. `JournalExport` is the snapshot handed to hosts that
//! persist or display the log stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quill_contracts::log::LogEntry;

/// A single link in the journal's hash chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    pub entry: LogEntry,

    /// `this_hash` of the previous record, or `GENESIS_HASH` for entry 0.
    pub prev_hash: String,

    /// SHA-256 (hex) over the journal id, `prev_hash`, and the entry fields.
    pub this_hash: String,
}

impl JournalRecord {
    /// The `prev_hash` of the first entry ever appended to a journal.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// Every retained record of one journal, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalExport {
    pub journal_id: String,
    pub records: Vec<JournalRecord>,
    pub exported_at: DateTime<Utc>,
    /// `this_hash` of the newest record. Empty when nothing was appended.
    pub terminal_hash: String,
    /// Entries dropped from the front because of the capacity limit.
    pub evicted: u64,
}
