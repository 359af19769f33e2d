//! Hash-chain primitives for journal records.
//!
//! Hash input layout (bytes, in order):
//!   1. journal_id as UTF-8 bytes
//!   2. entry id as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. timestamp as RFC 3339 UTF-8 bytes
//!   5. agent name, entry type, and message, each followed by a 0 byte

use sha2::{Digest, Sha256};

use quill_contracts::log::LogEntry;

use crate::record::JournalRecord;

/// Compute the lowercase hex SHA-256 for one entry.
pub fn hash_entry(journal_id: &str, entry: &LogEntry, prev_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(journal_id.as_bytes());
    hasher.update(entry.id.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(entry.timestamp.to_rfc3339().as_bytes());
    for field in [entry.agent_name.as_str(), entry.kind.as_str(), entry.message.as_str()] {
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Verify linkage and hash correctness of a run of records.
///
/// A run that starts at entry 0 must link to `GENESIS_HASH`. A run whose
/// front was evicted is anchored at its first record's `prev_hash`. An empty
/// run is valid.
pub fn verify_chain(journal_id: &str, records: &[JournalRecord]) -> bool {
    let mut expected_prev = match records.first() {
        Some(first) if first.entry.id == 0 => JournalRecord::GENESIS_HASH.to_string(),
        Some(first) => first.prev_hash.clone(),
        None => return true,
    };
    let mut expected_id = records[0].entry.id;

    for record in records {
        if record.entry.id != expected_id || record.prev_hash != expected_prev {
            return false;
        }
        if record.this_hash != hash_entry(journal_id, &record.entry, &record.prev_hash) {
            return false;
        }
        expected_prev = record.this_hash.clone();
        expected_id += 1;
    }

    true
}
