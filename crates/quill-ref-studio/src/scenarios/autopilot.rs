//! Scenario 3: Autopilot
//!
//! Hands the wheel to the autopilot. On every tick it runs the cheapest
//! legal action until it reaches the configured action limit. The studio
//! config makes dialogue polish the cheapest follow-up once the batch is
//! done. A manual request made while a batch is in flight is ignored
//! without touching the model.

use std::sync::Arc;
use std::time::Duration;

use quill_config::EngineConfig;
use quill_contracts::{
    action::ActionKind,
    error::{QuillError, QuillResult},
};

use crate::model::ScriptedModel;

use super::{describe, Studio};

/// Actions the run is capped at when the config sets no limit.
const FALLBACK_MAX_ACTIONS: u32 = 6;

pub async fn run(config: &EngineConfig) -> QuillResult<Studio> {
    let mut config = config.clone();
    if config.autopilot.max_actions.is_none() {
        config.autopilot.max_actions = Some(FALLBACK_MAX_ACTIONS);
    }
    let model = ScriptedModel::new().with_latency(Duration::from_millis(20));
    let mut studio = Studio::new(&config, model, "autopilot");
    let executor = Arc::clone(&studio.executor);

    println!(
        "  Interval: {} ms, action limit: {}",
        config.autopilot.interval_ms,
        config.autopilot.max_actions.unwrap_or(FALLBACK_MAX_ACTIONS)
    );
    println!("  First pick: {:?}", executor.next_autopilot_action());
    println!();

    executor.set_auto_pilot(true);
    let handle = executor.spawn_autopilot();

    // Wait for the autopilot to start a batch, then try to jump the queue.
    while executor.current_action() != Some(ActionKind::WriteChapterParallel)
        && !handle.is_finished()
    {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let outcome = executor.execute_action(ActionKind::EditorReview).await;
    println!("  Manual Editor Review during the batch: {}", describe(&outcome));

    let executed = handle
        .await
        .map_err(|e| QuillError::generation(format!("autopilot task failed: {e}")))?;

    studio.print_new_logs();
    let state = if executor.auto_pilot() { "on" } else { "off" };
    println!("  Autopilot executed {executed} actions and is now {state}.");

    studio.print_summary();
    Ok(studio)
}

/// Run Scenario 3: Autopilot.
pub async fn run_scenario(config: &EngineConfig) -> QuillResult<()> {
    println!("=== Scenario 3: Autopilot ===");
    println!();

    run(config).await?;

    println!();
    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}
