//! Scenario 2: Revision Pass
//!
//! Starts from a drafted manuscript and exercises the chapter-level tools:
//!   1. Dialogue doctor on the selected chapter
//!   2. Refine with a target tone, then with out-of-range options (rejected)
//!   3. Continue the final chapter (status moves back to drafting)
//!   4. Editor review (read-only)
//!   5. Continue a chapter id that does not exist (no-op)

use quill_config::EngineConfig;
use quill_contracts::{
    action::ActionKind,
    error::QuillResult,
    project::{ChapterId, RefineOptions},
};
use quill_core::traits::ProjectStore;

use crate::model::ScriptedModel;

use super::{describe, Studio};

pub async fn run(config: &EngineConfig) -> QuillResult<Studio> {
    let mut studio = Studio::new(config, ScriptedModel::new(), "revision");

    println!("  Setup: outline and first draft");
    studio.executor.execute_action(ActionKind::CreateOutline).await;
    studio.executor.execute_action(ActionKind::WriteChapterParallel).await;
    studio.print_new_logs();
    println!();

    let chapters = studio.project().chapters;
    let (Some(second), Some(last)) = (chapters.get(1), chapters.last()) else {
        println!("  Outline produced too few chapters; nothing to revise.");
        return Ok(studio);
    };

    println!("  Step 1: Dialogue Doctor on \"{}\"", second.title);
    studio.store.select_chapter(Some(second.id));
    let outcome = studio.executor.execute_action(ActionKind::DialogueDoctor).await;
    studio.print_new_logs();
    println!("    Outcome: {}", describe(&outcome));

    println!("  Step 2a: Refine \"{}\" toward an ominous tone", second.title);
    let options = RefineOptions {
        focus_areas: vec!["pacing".to_string(), "imagery".to_string()],
        target_tone: Some("ominous".to_string()),
        ..RefineOptions::default()
    };
    let outcome = studio.executor.refine_chapter(second.id, &options, None).await;
    studio.print_new_logs();
    println!("    Outcome: {}", describe(&outcome));

    println!("  Step 2b: Refine with temperature 3.0");
    let wild = RefineOptions { temperature: 3.0, ..RefineOptions::default() };
    let outcome = studio.executor.refine_chapter(second.id, &wild, None).await;
    studio.print_new_logs();
    println!("    Outcome: {}", describe(&outcome));

    println!("  Step 3: Continue \"{}\"", last.title);
    let outcome = studio.executor.continue_chapter(last.id).await;
    studio.print_new_logs();
    println!("    Outcome: {}", describe(&outcome));

    println!("  Step 4: Editor Review");
    let outcome = studio.executor.execute_action(ActionKind::EditorReview).await;
    studio.print_new_logs();
    println!("    Outcome: {}", describe(&outcome));

    println!("  Step 5: Continue an unknown chapter");
    let outcome = studio.executor.continue_chapter(ChapterId::new()).await;
    studio.print_new_logs();
    println!("    Outcome: {}", describe(&outcome));

    studio.print_summary();
    Ok(studio)
}

/// Run Scenario 2: Revision Pass.
pub async fn run_scenario(config: &EngineConfig) -> QuillResult<()> {
    println!("=== Scenario 2: Revision Pass ===");
    println!();

    run(config).await?;

    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}
