//! The autopilot: a timer-driven loop that keeps executing the cheapest
//! legal action.
//!
//! The loop never queues work. A tick that finds the engine busy is skipped,
//! and the toggle is re-read on every tick, so switching it off stops the
//! loop before its next action.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use quill_contracts::{
    action::{ActionKind, AgentName},
    execution::ActionOutcome,
    log::LogKind,
};

use crate::executor::Executor;

/// What one autopilot tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The toggle is off.
    Disabled,
    /// The engine was busy; the tick was skipped.
    Busy,
    /// No action is currently legal.
    Idle,
    /// The action was executed (successfully or not).
    Executed(ActionKind),
}

impl Executor {
    pub fn auto_pilot(&self) -> bool {
        self.auto_pilot.load(Ordering::SeqCst)
    }

    /// Flip the toggle. A change is recorded in the log stream.
    pub fn set_auto_pilot(&self, enabled: bool) {
        let previous = self.auto_pilot.swap(enabled, Ordering::SeqCst);
        if previous == enabled {
            return;
        }
        info!(enabled, "autopilot toggled");
        let message = if enabled { "Autopilot engaged." } else { "Autopilot disengaged." };
        self.add_log(AgentName::System, message, LogKind::Info);
    }

    /// The action the autopilot would run next: the cheapest legal one.
    pub fn next_autopilot_action(&self) -> Option<ActionKind> {
        self.catalog
            .cheapest_available(&self.store.snapshot())
            .map(|a| a.kind)
    }

    /// Run one autopilot step.
    pub async fn autopilot_tick(&self) -> TickOutcome {
        if !self.auto_pilot() {
            return TickOutcome::Disabled;
        }
        if self.is_generating() {
            debug!("autopilot tick skipped: engine busy");
            return TickOutcome::Busy;
        }
        let Some(kind) = self.next_autopilot_action() else {
            debug!("autopilot tick: nothing available");
            return TickOutcome::Idle;
        };
        match self.execute_action(kind).await {
            ActionOutcome::Busy => TickOutcome::Busy,
            _ => TickOutcome::Executed(kind),
        }
    }

    /// Tick every `autopilot_interval` until the toggle is switched off.
    ///
    /// The first tick fires one interval after the call. When
    /// `autopilot_max_actions` is set, the loop turns the toggle off itself
    /// after that many executed actions. Returns the number executed.
    pub async fn run_autopilot(&self) -> u32 {
        let period = self.settings.autopilot_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut executed = 0u32;
        loop {
            ticker.tick().await;
            match self.autopilot_tick().await {
                TickOutcome::Disabled => break,
                TickOutcome::Executed(kind) => {
                    executed += 1;
                    debug!(action = %kind, executed, "autopilot executed action");
                    if self.settings.autopilot_max_actions.is_some_and(|max| executed >= max) {
                        self.auto_pilot.store(false, Ordering::SeqCst);
                        info!(executed, "autopilot reached its action limit");
                        self.add_log(
                            AgentName::System,
                            format!("Autopilot stopped after {executed} actions."),
                            LogKind::Info,
                        );
                        break;
                    }
                }
                TickOutcome::Busy | TickOutcome::Idle => {}
            }
        }
        executed
    }

    /// Run the autopilot loop on its own task.
    pub fn spawn_autopilot(self: &Arc<Self>) -> JoinHandle<u32> {
        let executor = Arc::clone(self);
        tokio::spawn(async move { executor.run_autopilot().await })
    }
}
