//! Engine lock state and per-call outcomes.
//!
//! `ExecutionState` is what the engine holds while it works. `ActionOutcome`
//! is what every public entry point returns to the caller.

use serde::{Deserialize, Serialize};

use crate::{action::ActionKind, project::ChapterId};

/// The work currently holding the engine lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activity {
    Action(ActionKind),
    Refine(ChapterId),
    Continue(ChapterId),
}

/// The engine lock.
///
/// There is no "busy without an activity" state: whoever holds the lock
/// always says what it is doing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionState {
    #[default]
    Idle,
    Busy(Activity),
}

impl ExecutionState {
    pub fn is_busy(&self) -> bool {
        matches!(self, ExecutionState::Busy(_))
    }

    /// The catalog action in flight, if the lock is held by one.
    pub fn current_action(&self) -> Option<ActionKind> {
        match self {
            ExecutionState::Busy(Activity::Action(kind)) => Some(*kind),
            _ => None,
        }
    }
}

/// Per-chapter tallies from one parallel batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Chapters attempted in this batch.
    pub attempted: usize,
    /// Chapters whose draft call resolved, in completion order.
    pub completed: Vec<ChapterId>,
    /// Chapters whose draft call rejected, in completion order.
    pub failed: Vec<ChapterId>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The result of asking the engine to do something.
///
/// Callers pattern-match on this; failures are also recorded in the log
/// stream, so ignoring the outcome loses nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The engine was already busy. Nothing ran and nothing was logged.
    Busy,
    /// The target chapter did not resolve. Nothing ran.
    ChapterNotFound(ChapterId),
    /// A guard rejected the request before any AI call; a warning was logged.
    Skipped { reason: String },
    /// The action ran and its result was applied.
    Completed,
    /// A parallel batch settled. Some chapters may have failed.
    Batch(BatchReport),
    /// The AI call or output verification failed; nothing was applied.
    Failed { reason: String },
}
