//! Scenario 1: First Draft
//!
//! Takes a bare premise to a complete draft with manual action choices:
//!   1. Create the outline (four chapters)
//!   2. Develop characters, then build the world
//!   3. Draft every chapter in parallel; chapter 3 fails once upstream
//!   4. Re-run the batch, which only retries the failed chapter
//!   5. Journal integrity verified at the end

use quill_config::EngineConfig;
use quill_contracts::{action::ActionKind, error::QuillResult};

use crate::model::ScriptedModel;

use super::{describe, Studio};

/// Run Scenario 1 and return the finished studio for inspection.
pub async fn run(config: &EngineConfig) -> QuillResult<Studio> {
    let model = ScriptedModel::new().fail_chapter_once(3);
    let mut studio = Studio::new(config, model, "first-draft");

    let steps = [
        ActionKind::CreateOutline,
        ActionKind::DevelopCharacters,
        ActionKind::BuildWorld,
        ActionKind::WriteChapterParallel,
        ActionKind::WriteChapterParallel,
    ];

    for (n, kind) in steps.into_iter().enumerate() {
        let label = studio.executor.catalog().get(kind).label;
        let available = studio.executor.is_action_available(studio.executor.catalog().get(kind));
        let state = if available { "AVAILABLE" } else { "BLOCKED" };
        println!("  Step {}: {} [{}]", n + 1, label, state);

        let outcome = studio.executor.execute_action(kind).await;
        studio.print_new_logs();
        println!("    Outcome: {}", describe(&outcome));
    }

    studio.print_summary();
    Ok(studio)
}

/// Run Scenario 1: First Draft.
pub async fn run_scenario(config: &EngineConfig) -> QuillResult<()> {
    println!("=== Scenario 1: First Draft ===");
    println!();

    run(config).await?;

    println!();
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}
