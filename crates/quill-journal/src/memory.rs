//! In-memory implementation of `Journal`.
//!
//! `InMemoryJournal` keeps records in a `VecDeque` behind a `Mutex`, so the
//! parallel chapter writer can append from several completions at once.
//! With a capacity set, the oldest records are dropped first; the retained
//! run still verifies.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use quill_contracts::{
    action::AgentName,
    log::{LogEntry, LogKind, LogLevel},
};
use quill_core::traits::Journal;

use crate::{
    chain::{hash_entry, verify_chain},
    record::{JournalExport, JournalRecord},
};

// ── Internal mutable state ───────────────────────────────────────────────────

pub(crate) struct JournalState {
    pub(crate) records: VecDeque<JournalRecord>,
    /// Id assigned to the next entry.
    pub(crate) next_id: u64,
    pub(crate) last_hash: String,
    pub(crate) evicted: u64,
}

// ── Public journal ───────────────────────────────────────────────────────────

/// An append-only journal backed by a SHA-256 hash chain.
pub struct InMemoryJournal {
    journal_id: String,
    capacity: Option<usize>,
    pub(crate) state: Arc<Mutex<JournalState>>,
}

impl InMemoryJournal {
    /// Create an unbounded journal.
    pub fn new(journal_id: impl Into<String>) -> Self {
        Self::with_capacity(journal_id, None)
    }

    /// Create a journal that retains at most `capacity` entries.
    /// A capacity of zero is treated as one.
    pub fn with_capacity(journal_id: impl Into<String>, capacity: Option<usize>) -> Self {
        let state = JournalState {
            records: VecDeque::new(),
            next_id: 0,
            last_hash: JournalRecord::GENESIS_HASH.to_string(),
            evicted: 0,
        };
        Self {
            journal_id: journal_id.into(),
            capacity: capacity.map(|c| c.max(1)),
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JournalState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn journal_id(&self) -> &str {
        &self.journal_id
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Snapshot every retained record with the chain's terminal hash.
    pub fn export_log(&self) -> JournalExport {
        let state = self.lock();
        let terminal_hash = state
            .records
            .back()
            .map(|r| r.this_hash.clone())
            .unwrap_or_default();

        JournalExport {
            journal_id: self.journal_id.clone(),
            records: state.records.iter().cloned().collect(),
            exported_at: Utc::now(),
            terminal_hash,
            evicted: state.evicted,
        }
    }

    /// Check that no retained record was edited after it was appended.
    pub fn verify_integrity(&self) -> bool {
        let state = self.lock();
        let records: Vec<JournalRecord> = state.records.iter().cloned().collect();
        verify_chain(&self.journal_id, &records)
    }
}

/// Mirror an entry to diagnostic logging at the level matching its type.
fn mirror(entry: &LogEntry) {
    let agent = entry.agent_name.as_str();
    match entry.level {
        LogLevel::Debug => debug!(agent, id = entry.id, "{}", entry.message),
        LogLevel::Info => info!(agent, id = entry.id, "{}", entry.message),
        LogLevel::Warn => warn!(agent, id = entry.id, "{}", entry.message),
        LogLevel::Error => error!(agent, id = entry.id, "{}", entry.message),
    }
}

// ── Journal impl ─────────────────────────────────────────────────────────────

impl Journal for InMemoryJournal {
    fn append(&self, agent: AgentName, message: String, kind: LogKind) -> LogEntry {
        let mut state = self.lock();

        let entry = LogEntry {
            id: state.next_id,
            timestamp: Utc::now(),
            agent_name: agent,
            message,
            kind,
            level: kind.level(),
        };
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(&self.journal_id, &entry, &prev_hash);

        state.records.push_back(JournalRecord {
            entry: entry.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.next_id += 1;
        state.last_hash = this_hash;

        if let Some(capacity) = self.capacity {
            while state.records.len() > capacity {
                state.records.pop_front();
                state.evicted += 1;
            }
        }
        drop(state);

        mirror(&entry);
        entry
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.lock().records.iter().map(|r| r.entry.clone()).collect()
    }
}
