//! Writing-studio demo scenarios.
//!
//! Each scenario wires real QUILL components (config, journal, verifier,
//! executor) to the scripted model and walks one workflow end to end.

pub mod autopilot;
pub mod first_draft;
pub mod revision;

use std::sync::Arc;

use quill_config::EngineConfig;
use quill_contracts::{error::QuillResult, execution::ActionOutcome, project::Project};
use quill_core::{traits::ProjectStore, Executor, InMemoryProjectStore};
use quill_journal::InMemoryJournal;
use quill_verify::SchemaVerifier;

use crate::{mock_data, model::ScriptedModel};

/// The engine configuration shipped with the studio.
pub const STUDIO_CONFIG: &str = include_str!("../../config/studio.toml");

/// Parse the bundled configuration.
pub fn studio_config() -> QuillResult<EngineConfig> {
    EngineConfig::from_toml_str(STUDIO_CONFIG)
}

/// One wired-up engine plus inspectable handles on its collaborators.
pub struct Studio {
    pub executor: Arc<Executor>,
    pub store: Arc<InMemoryProjectStore>,
    pub journal: Arc<InMemoryJournal>,
    printed: usize,
}

impl Studio {
    /// Build an engine for a fresh project from `config`.
    pub fn new(config: &EngineConfig, model: ScriptedModel, journal_id: &str) -> Self {
        let store = Arc::new(InMemoryProjectStore::new(Project::new(
            mock_data::PREMISE,
            mock_data::STYLE,
        )));
        let journal =
            Arc::new(InMemoryJournal::with_capacity(journal_id, config.journal_capacity()));
        let verifier = SchemaVerifier::new().forbid("as an ai language model");

        let executor = Executor::new(Arc::new(model), store.clone(), journal.clone())
            .with_settings(config.settings())
            .with_catalog(config.catalog())
            .with_verifier(Box::new(verifier));

        Self { executor: Arc::new(executor), store, journal, printed: 0 }
    }

    pub fn project(&self) -> Project {
        self.store.snapshot()
    }

    /// Print journal entries appended since the last call.
    pub fn print_new_logs(&mut self) {
        let entries = self.executor.logs();
        for entry in entries.iter().filter(|e| e.id as usize >= self.printed) {
            println!(
                "    [{:<9}] {:<7} {}",
                entry.agent_name.as_str(),
                entry.kind.as_str(),
                first_line(&entry.message)
            );
        }
        self.printed = entries.last().map_or(self.printed, |e| e.id as usize + 1);
    }

    /// Print the project's progress counters and the journal's integrity.
    pub fn print_summary(&self) {
        let project = self.project();
        let ws = &project.world_state;
        println!();
        println!("  Title:                  {}", project.title);
        println!("  Chapters completed:     {}/{}", ws.chapters_completed, ws.chapters_count);
        println!("  Total words:            {}", project.analytics.total_words);
        println!(
            "  Actions:                {} completed, {} failed",
            project.analytics.actions_completed, project.analytics.actions_failed
        );
        println!(
            "  Journal integrity:      {} ({} entries)",
            if self.journal.verify_integrity() { "VERIFIED" } else { "FAILED" },
            self.journal.len()
        );
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// One-word description of an outcome, for scenario output.
pub fn describe(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Busy => "BUSY".to_string(),
        ActionOutcome::ChapterNotFound(id) => format!("CHAPTER NOT FOUND ({id})"),
        ActionOutcome::Skipped { reason } => format!("SKIPPED ({reason})"),
        ActionOutcome::Completed => "COMPLETED".to_string(),
        ActionOutcome::Batch(report) => format!(
            "BATCH ({} of {} drafted, {} failed)",
            report.completed.len(),
            report.attempted,
            report.failed.len()
        ),
        ActionOutcome::Failed { reason } => format!("FAILED ({reason})"),
    }
}
