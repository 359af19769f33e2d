//! # quill-journal
//!
//! Append-only, SHA-256 hash-chained progress journal for the QUILL engine.
//!
//! ## Overview
//!
//! Every entry the executor appends is wrapped in a `JournalRecord` that
//! links to the previous record via its hash. Editing any retained entry,
//! even its timestamp, breaks the chain and is caught by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quill_journal::InMemoryJournal;
//! use quill_core::traits::Journal;
//!
//! let journal = InMemoryJournal::with_capacity("novel-001", Some(500));
//! journal.append(AgentName::System, "Autopilot engaged.".into(), LogKind::Info);
//!
//! assert!(journal.verify_integrity());
//! let export = journal.export_log();
//! ```

pub mod chain;
pub mod memory;
pub mod record;

pub use chain::{hash_entry, verify_chain};
pub use memory::InMemoryJournal;
pub use record::{JournalExport, JournalRecord};

// ── Tests ────────────────────────────────────────────────────────────────────
