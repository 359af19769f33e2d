//! The QUILL executor: the single-lock action runner.
//!
//! Every entry point follows the same shape:
//!
//!   Lock → Snapshot → [StoryModel call] → Verify → Apply → Log → Unlock
//!
//! The lock is an `ExecutionState` owned by the executor. It is checked and
//! set before the first await, and released by a drop guard, so every exit
//! path (success, failure, early return, panic) leaves the engine idle.

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};

use quill_contracts::{
    action::{ActionKind, AgentAction, AgentName},
    error::{QuillError, QuillResult},
    execution::{ActionOutcome, Activity, ExecutionState},
    log::{LogEntry, LogKind},
    project::{Chapter, ChapterId, ChapterStatus, Outline, RefineOptions},
    world::MAX_CHAPTERS,
};

use crate::{
    catalog::{self, Catalog},
    traits::{update, Journal, OutputVerifier, ProjectStore, StoryModel},
};

const PLOT_MARKER: &str = "--- PLOT ENHANCEMENTS ---";
const WORLD_MARKER: &str = "--- WORLD BIBLE ---";
const CHARACTER_MARKER: &str = "--- CHARACTER PROFILES ---";

/// Tunables for the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Time between autopilot ticks.
    pub autopilot_interval: Duration,
    /// Turn the autopilot off after this many executed actions.
    pub autopilot_max_actions: Option<u32>,
    /// Maximum chapter drafts in flight during one batch. `None` is unbounded.
    pub max_concurrency: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            autopilot_interval: Duration::from_secs(2),
            autopilot_max_actions: None,
            max_concurrency: Some(4),
        }
    }
}

/// Which section of the premise a planning action appends to.
#[derive(Debug, Clone, Copy)]
enum PremiseSection {
    Plot,
    Characters,
    World,
}

impl PremiseSection {
    fn marker(self) -> &'static str {
        match self {
            PremiseSection::Plot => PLOT_MARKER,
            PremiseSection::Characters => CHARACTER_MARKER,
            PremiseSection::World => WORLD_MARKER,
        }
    }

    fn done_message(self) -> &'static str {
        match self {
            PremiseSection::Plot => "Plot deepened with new twists and subplots.",
            PremiseSection::Characters => "Character profiles added to the story bible.",
            PremiseSection::World => "World bible added to the story notes.",
        }
    }
}

/// The engine.
///
/// One executor drives one project. Share it behind an `Arc` when the
/// autopilot runs on its own task.
pub struct Executor {
    pub(crate) model: Arc<dyn StoryModel>,
    pub(crate) store: Arc<dyn ProjectStore>,
    journal: Arc<dyn Journal>,
    verifier: Option<Box<dyn OutputVerifier>>,
    pub(crate) catalog: Catalog,
    pub(crate) settings: EngineSettings,
    state: Mutex<ExecutionState>,
    pub(crate) auto_pilot: AtomicBool,
}

/// Holds the engine lock. Dropping it releases the lock.
pub(crate) struct BusyGuard<'a> {
    executor: &'a Executor,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.executor.lock_state() = ExecutionState::Idle;
        update(self.executor.store.as_ref(), |p| p.is_generating = false);
        debug!("engine lock released");
    }
}

impl Executor {
    /// Create an executor with the standard catalog and default settings.
    pub fn new(
        model: Arc<dyn StoryModel>,
        store: Arc<dyn ProjectStore>,
        journal: Arc<dyn Journal>,
    ) -> Self {
        Self {
            model,
            store,
            journal,
            verifier: None,
            catalog: Catalog::standard(),
            settings: EngineSettings::default(),
            state: Mutex::new(ExecutionState::Idle),
            auto_pilot: AtomicBool::new(false),
        }
    }

    /// Check every generated payload with `verifier` before applying it.
    pub fn with_verifier(mut self, verifier: Box<dyn OutputVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    // ── Lock ─────────────────────────────────────────────────────────────────

    fn lock_state(&self) -> MutexGuard<'_, ExecutionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn execution_state(&self) -> ExecutionState {
        *self.lock_state()
    }

    /// The catalog action holding the lock, if any.
    pub fn current_action(&self) -> Option<ActionKind> {
        self.lock_state().current_action()
    }

    /// True while the engine (or the host, via `Project::is_generating`)
    /// reports work in progress.
    pub fn is_generating(&self) -> bool {
        self.lock_state().is_busy() || self.store.snapshot().is_generating
    }

    /// Take the lock for `activity`, or return `None` if anything holds it.
    pub(crate) fn try_begin(&self, activity: Activity) -> Option<BusyGuard<'_>> {
        {
            let mut state = self.lock_state();
            if state.is_busy() || self.store.snapshot().is_generating {
                return None;
            }
            *state = ExecutionState::Busy(activity);
        }
        update(self.store.as_ref(), |p| p.is_generating = true);
        debug!(?activity, "engine lock acquired");
        Some(BusyGuard { executor: self })
    }

    // ── Log stream ───────────────────────────────────────────────────────────

    /// Append an entry to the log stream.
    pub fn add_log(&self, agent: AgentName, message: impl Into<String>, kind: LogKind) -> LogEntry {
        self.journal.append(agent, message.into(), kind)
    }

    /// Every retained log entry, oldest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.journal.entries()
    }

    /// Log a guard rejection from the planner and report it as skipped.
    pub(crate) fn skip(&self, message: &str) -> ActionOutcome {
        self.add_log(AgentName::Planner, message, LogKind::Warning);
        ActionOutcome::Skipped { reason: message.to_string() }
    }

    // ── Availability ─────────────────────────────────────────────────────────

    /// Actions currently legal, in catalog order.
    pub fn available_actions(&self) -> Vec<&AgentAction> {
        self.catalog.available(&self.store.snapshot())
    }

    pub fn is_action_available(&self, action: &AgentAction) -> bool {
        catalog::is_available(action, &self.store.snapshot())
    }

    // ── Verification ─────────────────────────────────────────────────────────

    pub(crate) fn check_text(&self, purpose: &str, text: &str) -> QuillResult<()> {
        let Some(verifier) = &self.verifier else {
            return Ok(());
        };
        let report = verifier.verify_text(purpose, text)?;
        if report.passed {
            Ok(())
        } else {
            Err(QuillError::VerificationFailed { reason: report.summary() })
        }
    }

    fn check_outline(&self, outline: &Outline) -> QuillResult<()> {
        if let Some(verifier) = &self.verifier {
            let report = verifier.verify_outline(outline)?;
            if !report.passed {
                return Err(QuillError::VerificationFailed { reason: report.summary() });
            }
        }
        if outline.chapters.is_empty() {
            return Err(QuillError::InvalidOutput {
                reason: "outline contains no chapters".to_string(),
            });
        }
        if outline.chapters.len() > MAX_CHAPTERS as usize {
            return Err(QuillError::InvalidOutput {
                reason: format!(
                    "outline has {} chapters; the limit is {}",
                    outline.chapters.len(),
                    MAX_CHAPTERS
                ),
            });
        }
        Ok(())
    }

    // ── Catalog actions ──────────────────────────────────────────────────────

    /// Run one catalog action to completion.
    ///
    /// Returns `ActionOutcome::Busy` without logging or calling the model if
    /// anything already holds the lock. Model and verification failures are
    /// logged as `"Action Failed: ..."` and reported as `Failed`; they never
    /// surface as an `Err`.
    ///
    /// Catalog preconditions are not re-checked here: callers pick from
    /// `available_actions()`. Guards that need a concrete target (a chapter
    /// with content, an unfinished chapter) log a planner warning instead.
    pub async fn execute_action(&self, kind: ActionKind) -> ActionOutcome {
        let Some(_guard) = self.try_begin(Activity::Action(kind)) else {
            debug!(action = %kind, "engine busy, request ignored");
            return ActionOutcome::Busy;
        };

        let action = self.catalog.get(kind);
        info!(action = %kind, cost = action.cost, "action starting");
        self.add_log(kind.persona(), format!("Starting: {}", action.label), LogKind::Info);

        let result = match kind {
            ActionKind::CreateOutline => self.create_outline(action).await,
            ActionKind::DeepenPlot => self.extend_premise(action, PremiseSection::Plot).await,
            ActionKind::DevelopCharacters => {
                self.extend_premise(action, PremiseSection::Characters).await
            }
            ActionKind::BuildWorld => self.extend_premise(action, PremiseSection::World).await,
            ActionKind::WriteChapterParallel => self.write_chapters_parallel(action).await,
            ActionKind::DialogueDoctor => self.dialogue_doctor(action).await,
            ActionKind::EditorReview => self.editor_review(action).await,
        };

        self.settle(kind.as_str(), "Action Failed", result)
    }

    /// Turn a procedure result into an outcome, logging failures and
    /// updating the project analytics.
    fn settle(
        &self,
        what: &str,
        failure_prefix: &str,
        result: QuillResult<ActionOutcome>,
    ) -> ActionOutcome {
        match result {
            Ok(outcome) => {
                let succeeded = match &outcome {
                    ActionOutcome::Completed => Some(true),
                    ActionOutcome::Batch(report) => Some(!report.completed.is_empty()),
                    _ => None,
                };
                if let Some(succeeded) = succeeded {
                    update(self.store.as_ref(), |p| {
                        if succeeded {
                            p.analytics.actions_completed += 1;
                        } else {
                            p.analytics.actions_failed += 1;
                        }
                    });
                }
                info!(action = what, ?outcome, "action finished");
                outcome
            }
            Err(err) => {
                warn!(action = what, error = %err, "action failed");
                self.add_log(AgentName::System, format!("{failure_prefix}: {err}"), LogKind::Error);
                update(self.store.as_ref(), |p| p.analytics.actions_failed += 1);
                ActionOutcome::Failed { reason: err.to_string() }
            }
        }
    }

    async fn create_outline(&self, action: &AgentAction) -> QuillResult<ActionOutcome> {
        let project = self.store.snapshot();
        let outline = self.model.generate_outline(&project.idea, &project.style).await?;
        self.check_outline(&outline)?;

        let mut entries = outline.chapters;
        entries.sort_by_key(|c| c.order_index);
        let chapters: Vec<Chapter> = entries
            .into_iter()
            .map(|c| Chapter::new(c.order_index, c.title, c.summary))
            .collect();
        let first = chapters.first().map(|c| c.id);
        let count = chapters.len();
        let title = outline.title;
        let message = format!("Outline created: \"{title}\" with {count} chapters.");

        update(self.store.as_ref(), |p| {
            p.title = title;
            p.chapters = chapters;
            action.effects.apply_to(&mut p.world_state);
            p.recount();
        });
        self.store.select_chapter(first);

        self.add_log(AgentName::Architect, message, LogKind::Success);
        Ok(ActionOutcome::Completed)
    }

    async fn extend_premise(
        &self,
        action: &AgentAction,
        section: PremiseSection,
    ) -> QuillResult<ActionOutcome> {
        let project = self.store.snapshot();
        let text = match section {
            PremiseSection::Plot | PremiseSection::World => {
                self.model.build_world(&project.idea, &project.style).await?
            }
            PremiseSection::Characters => {
                self.model.develop_characters(&project.idea, &project.style).await?
            }
        };
        self.check_text(action.kind.as_str(), &text)?;

        update(self.store.as_ref(), |p| {
            p.idea = format!("{}\n\n{}\n{}", p.idea.trim_end(), section.marker(), text.trim());
            action.effects.apply_to(&mut p.world_state);
            p.recount();
        });

        self.add_log(action.kind.persona(), section.done_message(), LogKind::Success);
        Ok(ActionOutcome::Completed)
    }

    async fn dialogue_doctor(&self, action: &AgentAction) -> QuillResult<ActionOutcome> {
        let project = self.store.snapshot();
        let target = self
            .store
            .selected_chapter()
            .and_then(|id| project.chapter(&id))
            .or_else(|| project.chapters.iter().min_by_key(|c| c.order_index));

        let Some(chapter) = target else {
            return Ok(self.skip("No chapter selected for dialogue polish."));
        };
        if !chapter.has_content() {
            return Ok(self.skip("No content available to polish dialogue."));
        }

        let id = chapter.id;
        let title = chapter.title.clone();
        let polished = self.model.polish_dialogue(&chapter.content, &project.style).await?;
        self.check_text(action.kind.as_str(), &polished)?;

        update(self.store.as_ref(), |p| {
            if let Some(c) = p.chapter_mut(&id) {
                c.set_content(polished);
            }
            action.effects.apply_to(&mut p.world_state);
            p.recount();
        });
        self.store.select_chapter(Some(id));

        self.add_log(
            AgentName::Doctor,
            format!("Dialogue polished in \"{title}\"."),
            LogKind::Success,
        );
        Ok(ActionOutcome::Completed)
    }

    async fn editor_review(&self, action: &AgentAction) -> QuillResult<ActionOutcome> {
        let project = self.store.snapshot();
        if project.chapters.is_empty() {
            return Ok(self.skip("No chapters available for review."));
        }

        let report = self.model.analyze_consistency(&project.chapters, &project.style).await?;
        self.check_text(action.kind.as_str(), &report)?;

        self.add_log(AgentName::Editor, report.trim(), LogKind::Thought);
        self.add_log(AgentName::Editor, "Consistency review complete.", LogKind::Success);
        Ok(ActionOutcome::Completed)
    }

    // ── Direct chapter operations ────────────────────────────────────────────

    /// Rewrite one chapter's content with the given options.
    ///
    /// `current_content` overrides the stored content, e.g. unsaved edits in
    /// the host's editor. The chapter status is left unchanged. A busy engine
    /// ignores the call; out-of-range options are rejected with a planner
    /// warning.
    pub async fn refine_chapter(
        &self,
        chapter_id: ChapterId,
        options: &RefineOptions,
        current_content: Option<&str>,
    ) -> ActionOutcome {
        let Some(_guard) = self.try_begin(Activity::Refine(chapter_id)) else {
            return ActionOutcome::Busy;
        };
        if let Err(reason) = options.validate() {
            let err = QuillError::InvalidOptions { reason };
            return self.skip(&err.to_string());
        }
        let project = self.store.snapshot();
        let Some(chapter) = project.chapter(&chapter_id) else {
            debug!(chapter = %chapter_id, "refine target not found");
            return ActionOutcome::ChapterNotFound(chapter_id);
        };

        self.add_log(
            AgentName::Editor,
            format!("Refining \"{}\" with {}...", chapter.title, options.model),
            LogKind::Info,
        );
        let content = current_content.unwrap_or(&chapter.content);
        let result = self.apply_refinement(chapter, content, &project.style, options).await;

        self.settle("refine_chapter", "Refinement failed", result)
    }

    /// Generate more text for one chapter and append it.
    ///
    /// The new text follows a blank line, or replaces empty content outright.
    /// The chapter moves to `Drafting`.
    pub async fn continue_chapter(&self, chapter_id: ChapterId) -> ActionOutcome {
        let Some(_guard) = self.try_begin(Activity::Continue(chapter_id)) else {
            return ActionOutcome::Busy;
        };
        let project = self.store.snapshot();
        let Some(chapter) = project.chapter(&chapter_id) else {
            debug!(chapter = %chapter_id, "continue target not found");
            return ActionOutcome::ChapterNotFound(chapter_id);
        };

        self.add_log(
            AgentName::Writer,
            format!("Continuing \"{}\"...", chapter.title),
            LogKind::Info,
        );

        let result = self.apply_continuation(chapter, &project.style).await;

        self.settle("continue_chapter", "Continuation failed", result)
    }

    async fn apply_refinement(
        &self,
        chapter: &Chapter,
        content: &str,
        style: &str,
        options: &RefineOptions,
    ) -> QuillResult<ActionOutcome> {
        let refined = self.model.refine_chapter(content, &chapter.summary, style, options).await?;
        self.check_text("refine_chapter", &refined)?;

        let id = chapter.id;
        update(self.store.as_ref(), |p| {
            if let Some(c) = p.chapter_mut(&id) {
                c.set_content(refined);
            }
            p.recount();
        });
        self.store.select_chapter(Some(id));
        self.add_log(AgentName::Editor, "Refinement complete.", LogKind::Success);
        Ok(ActionOutcome::Completed)
    }

    async fn apply_continuation(
        &self,
        chapter: &Chapter,
        style: &str,
    ) -> QuillResult<ActionOutcome> {
        let addition = self
            .model
            .continue_writing(&chapter.content, &chapter.summary, style)
            .await?;
        self.check_text("continue_chapter", &addition)?;

        let id = chapter.id;
        let added = addition.chars().count();
        update(self.store.as_ref(), |p| {
            if let Some(c) = p.chapter_mut(&id) {
                let content = if c.content.is_empty() {
                    addition
                } else {
                    format!("{}\n\n{}", c.content, addition)
                };
                c.set_content(content);
                c.status = ChapterStatus::Drafting;
            }
            p.recount();
        });
        self.store.select_chapter(Some(id));
        self.add_log(AgentName::Writer, format!("Added {added} chars"), LogKind::Success);
        Ok(ActionOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quill_contracts::{
        action::{ActionKind, AgentName},
        execution::{ActionOutcome, ExecutionState},
        log::LogKind,
        project::{
            Chapter, ChapterId, ChapterStatus, Outline, OutlineChapter, Project, RefineOptions,
        },
    };

    use crate::{
        test_support::{harness, outline_of, MockModel, RejectingVerifier},
        traits::{update, ProjectStore},
    };

    fn project_with_chapter(content: &str) -> (Project, ChapterId) {
        let mut project = Project::new("A diver finds a door on the seabed", "thriller");
        project.world_state.has_outline = true;
        let mut chapter = Chapter::new(1, "The Door", "She finds it");
        if !content.is_empty() {
            chapter.set_content(content);
        }
        let id = chapter.id;
        project.chapters.push(chapter);
        project.recount();
        (project, id)
    }

    // ── Outline ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn create_outline_populates_project() {
        let model = MockModel {
            outline: Some(outline_of("Tidewater", &["Arrival", "Descent"])),
            ..MockModel::default()
        };
        let h = harness(model, Project::new("A diver finds a door", "thriller"));

        let outcome = h.executor.execute_action(ActionKind::CreateOutline).await;
        assert_eq!(outcome, ActionOutcome::Completed);

        let project = h.store.snapshot();
        assert_eq!(project.title, "Tidewater");
        assert_eq!(project.chapters.len(), 2);
        assert!(project.world_state.has_outline);
        assert!(project.world_state.has_title);
        assert_eq!(project.world_state.chapters_count, 2);
        assert!(project
            .chapters
            .iter()
            .all(|c| c.status == ChapterStatus::Pending && c.content.is_empty()));
        assert_eq!(h.store.selected_chapter(), Some(project.chapters[0].id));

        let logs = h.executor.logs();
        assert!(logs
            .iter()
            .any(|e| e.agent_name == AgentName::Architect && e.kind == LogKind::Success));
        assert_eq!(project.analytics.actions_completed, 1);
    }

    #[tokio::test]
    async fn outline_chapters_are_ordered_by_index() {
        let outline = Outline {
            title: "Out of Order".to_string(),
            chapters: vec![
                OutlineChapter {
                    order_index: 2,
                    title: "Second".to_string(),
                    summary: String::new(),
                },
                OutlineChapter {
                    order_index: 1,
                    title: "First".to_string(),
                    summary: String::new(),
                },
            ],
        };
        let h = harness(
            MockModel { outline: Some(outline), ..MockModel::default() },
            Project::new("idea", "noir"),
        );

        h.executor.execute_action(ActionKind::CreateOutline).await;

        let titles: Vec<String> =
            h.store.snapshot().chapters.into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn empty_outline_is_rejected() {
        let h = harness(
            MockModel { outline: Some(outline_of("Nothing", &[])), ..MockModel::default() },
            Project::new("idea", "noir"),
        );

        let outcome = h.executor.execute_action(ActionKind::CreateOutline).await;
        assert!(matches!(outcome, ActionOutcome::Failed { .. }));
        assert!(!h.store.snapshot().world_state.has_outline);
    }

    // ── Failure handling ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn model_failure_logs_and_releases_lock() {
        let h = harness(
            MockModel { fail_all: true, ..MockModel::default() },
            Project::new("idea", "noir"),
        );
        let before = h.store.snapshot();

        let outcome = h.executor.execute_action(ActionKind::BuildWorld).await;

        match outcome {
            ActionOutcome::Failed { reason } => assert!(reason.contains("mock failure")),
            other => panic!("expected Failed, got {:?}", other),
        }
        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.agent_name, AgentName::System);
        assert_eq!(last.kind, LogKind::Error);
        assert!(last.message.contains("Action Failed"));
        assert!(last.message.contains("mock failure"));

        let after = h.store.snapshot();
        assert_eq!(after.world_state, before.world_state, "no effects on failure");
        assert_eq!(after.idea, before.idea);
        assert_eq!(after.analytics.actions_failed, 1);
        assert!(!after.is_generating);
        assert_eq!(h.executor.execution_state(), ExecutionState::Idle);
    }

    #[tokio::test]
    async fn verifier_rejection_counts_as_failure() {
        let h = harness(
            MockModel { text: "notes".to_string(), ..MockModel::default() },
            Project::new("idea", "noir"),
        );
        let executor = h.executor.with_verifier(Box::new(RejectingVerifier));

        let outcome = executor.execute_action(ActionKind::DevelopCharacters).await;

        assert!(matches!(outcome, ActionOutcome::Failed { .. }));
        assert!(!h.store.snapshot().world_state.has_characters);
        let last = executor.logs().pop().unwrap();
        assert!(last.message.contains("Action Failed"));
        assert!(last.message.contains("verification failed"));
    }

    // ── Locking ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn second_call_while_busy_is_a_no_op() {
        let gate = Arc::new(tokio::sync::Notify::new());
        let model = MockModel {
            outline: Some(outline_of("Slow", &["One"])),
            gate: Some(gate.clone()),
            ..MockModel::default()
        };
        let h = harness(model, Project::new("idea", "noir"));
        let executor = Arc::new(h.executor);

        let running = {
            let executor = executor.clone();
            tokio::spawn(async move { executor.execute_action(ActionKind::CreateOutline).await })
        };
        while !executor.is_generating() {
            tokio::task::yield_now().await;
        }
        assert_eq!(executor.current_action(), Some(ActionKind::CreateOutline));
        assert!(h.store.snapshot().is_generating);

        let log_count = executor.logs().len();
        assert_eq!(executor.execute_action(ActionKind::BuildWorld).await, ActionOutcome::Busy);
        let chapter = ChapterId::new();
        assert_eq!(executor.continue_chapter(chapter).await, ActionOutcome::Busy);
        assert_eq!(
            executor.refine_chapter(chapter, &RefineOptions::default(), None).await,
            ActionOutcome::Busy
        );
        assert_eq!(executor.logs().len(), log_count, "busy calls log nothing");

        gate.notify_one();
        assert_eq!(running.await.unwrap(), ActionOutcome::Completed);

        assert_eq!(*h.calls.lock().unwrap(), vec!["generate_outline".to_string()]);
        assert_eq!(executor.current_action(), None);
        assert!(!h.store.snapshot().is_generating);
    }

    #[tokio::test]
    async fn host_generating_flag_blocks_execution() {
        let h = harness(MockModel::default(), Project::new("idea", "noir"));
        update(h.store.as_ref(), |p| p.is_generating = true);

        assert_eq!(h.executor.execute_action(ActionKind::BuildWorld).await, ActionOutcome::Busy);
        assert!(h.calls.lock().unwrap().is_empty());
    }

    // ── Planning actions ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn planning_actions_append_marked_sections() {
        let h = harness(
            MockModel { text: "Generated notes".to_string(), ..MockModel::default() },
            Project::new("A premise", "noir"),
        );

        h.executor.execute_action(ActionKind::DeepenPlot).await;
        h.executor.execute_action(ActionKind::DevelopCharacters).await;
        h.executor.execute_action(ActionKind::BuildWorld).await;

        let project = h.store.snapshot();
        assert!(project.idea.starts_with("A premise"));
        assert!(project.idea.contains("--- PLOT ENHANCEMENTS ---\nGenerated notes"));
        assert!(project.idea.contains("--- CHARACTER PROFILES ---\nGenerated notes"));
        assert!(project.idea.contains("--- WORLD BIBLE ---\nGenerated notes"));
        assert!(project.world_state.has_characters);
        assert!(project.world_state.has_world_building);

        let calls = h.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["build_world", "develop_characters", "build_world"]);
    }

    #[tokio::test]
    async fn action_start_and_end_are_logged() {
        let h = harness(
            MockModel { text: "Notes".to_string(), ..MockModel::default() },
            Project::new("idea", "noir"),
        );

        h.executor.execute_action(ActionKind::BuildWorld).await;

        let logs = h.executor.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].kind, LogKind::Info);
        assert_eq!(logs[0].message, "Starting: Build World");
        assert_eq!(logs[1].kind, LogKind::Success);
        assert_eq!(logs[1].agent_name, AgentName::Architect);
    }

    // ── Dialogue doctor ──────────────────────────────────────────────────────

    #[tokio::test]
    async fn dialogue_doctor_skips_empty_chapter() {
        let (project, _) = project_with_chapter("");
        let h = harness(MockModel::default(), project);

        let outcome = h.executor.execute_action(ActionKind::DialogueDoctor).await;

        assert!(matches!(outcome, ActionOutcome::Skipped { .. }));
        assert!(h.calls.lock().unwrap().is_empty(), "model must not be called");
        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.agent_name, AgentName::Planner);
        assert_eq!(last.kind, LogKind::Warning);
        assert_eq!(last.message, "No content available to polish dialogue.");
    }

    #[tokio::test]
    async fn dialogue_doctor_polishes_selected_chapter() {
        let (mut project, first) = project_with_chapter("\"Hi,\" she said.");
        let mut second = Chapter::new(2, "The Key", "");
        second.set_content("\"Who's there?\" he asked.");
        let second_id = second.id;
        project.chapters.push(second);
        project.recount();

        let model = MockModel { text: "Polished.".to_string(), ..MockModel::default() };
        let h = harness(model, project);
        h.store.select_chapter(Some(second_id));

        let outcome = h.executor.execute_action(ActionKind::DialogueDoctor).await;
        assert_eq!(outcome, ActionOutcome::Completed);

        let project = h.store.snapshot();
        assert_eq!(project.chapter(&second_id).unwrap().content, "Polished.");
        assert_eq!(project.chapter(&first).unwrap().content, "\"Hi,\" she said.");
        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.agent_name, AgentName::Doctor);
    }

    // ── Editor review ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn editor_review_is_read_only() {
        let (project, _) = project_with_chapter("Some prose.");
        let model = MockModel {
            text: "No contradictions found.".to_string(),
            ..MockModel::default()
        };
        let h = harness(model, project);
        let before = h.store.snapshot();

        let outcome = h.executor.execute_action(ActionKind::EditorReview).await;
        assert_eq!(outcome, ActionOutcome::Completed);

        let after = h.store.snapshot();
        assert_eq!(after.chapters, before.chapters);
        assert_eq!(after.world_state, before.world_state);

        let logs = h.executor.logs();
        assert!(logs
            .iter()
            .any(|e| e.kind == LogKind::Thought && e.message == "No contradictions found."));
        assert_eq!(logs.last().unwrap().message, "Consistency review complete.");
    }

    // ── Refine ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn refine_replaces_content_and_keeps_status() {
        let (project, id) = project_with_chapter("Rough draft.");
        let model = MockModel { text: "Refined draft.".to_string(), ..MockModel::default() };
        let h = harness(model, project);

        let outcome = h.executor.refine_chapter(id, &RefineOptions::default(), None).await;
        assert_eq!(outcome, ActionOutcome::Completed);

        let chapter = h.store.snapshot().chapter(&id).unwrap().clone();
        assert_eq!(chapter.content, "Refined draft.");
        assert_eq!(chapter.status, ChapterStatus::Pending);

        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.agent_name, AgentName::Editor);
        assert_eq!(last.message, "Refinement complete.");
        assert_eq!(h.calls.lock().unwrap()[0], "refine_chapter:Rough draft.");
    }

    #[tokio::test]
    async fn refine_uses_content_override() {
        let (project, id) = project_with_chapter("Stored.");
        let h = harness(MockModel { text: "Out.".to_string(), ..MockModel::default() }, project);

        h.executor.refine_chapter(id, &RefineOptions::default(), Some("Unsaved edits.")).await;

        assert_eq!(h.calls.lock().unwrap()[0], "refine_chapter:Unsaved edits.");
    }

    #[tokio::test]
    async fn refine_failure_keeps_content() {
        let (project, id) = project_with_chapter("Rough draft.");
        let h = harness(MockModel { fail_all: true, ..MockModel::default() }, project);

        let outcome = h.executor.refine_chapter(id, &RefineOptions::default(), None).await;

        assert!(matches!(outcome, ActionOutcome::Failed { .. }));
        assert_eq!(h.store.snapshot().chapter(&id).unwrap().content, "Rough draft.");
        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.kind, LogKind::Error);
        assert!(last.message.contains("mock failure"));
        assert!(!h.executor.is_generating());
    }

    #[tokio::test]
    async fn refine_unknown_chapter_is_a_no_op() {
        let (project, _) = project_with_chapter("Text.");
        let h = harness(MockModel::default(), project);
        let missing = ChapterId::new();

        let outcome = h.executor.refine_chapter(missing, &RefineOptions::default(), None).await;

        assert_eq!(outcome, ActionOutcome::ChapterNotFound(missing));
        assert!(h.calls.lock().unwrap().is_empty());
        assert!(h.executor.logs().is_empty());
        assert!(!h.executor.is_generating());
    }

    #[tokio::test]
    async fn refine_rejects_invalid_options() {
        let (project, id) = project_with_chapter("Text.");
        let h = harness(MockModel::default(), project);
        let options = RefineOptions { temperature: 9.0, ..RefineOptions::default() };

        let outcome = h.executor.refine_chapter(id, &options, None).await;

        assert!(matches!(outcome, ActionOutcome::Skipped { .. }));
        assert!(h.calls.lock().unwrap().is_empty());
        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.kind, LogKind::Warning);
        assert!(last.message.contains("temperature"));
    }

    #[tokio::test]
    async fn refine_while_busy_ignores_invalid_options() {
        let (project, id) = project_with_chapter("Text.");
        let h = harness(MockModel::default(), project);
        update(h.store.as_ref(), |p| p.is_generating = true);
        let options = RefineOptions { temperature: 9.0, ..RefineOptions::default() };

        let outcome = h.executor.refine_chapter(id, &options, None).await;

        assert_eq!(outcome, ActionOutcome::Busy);
        assert!(h.executor.logs().is_empty(), "no warning while generating");
        assert!(h.calls.lock().unwrap().is_empty());
    }

    // ── Continue ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn continue_appends_after_blank_line() {
        let (project, id) = project_with_chapter("Existing");
        let model = MockModel { text: "More content".to_string(), ..MockModel::default() };
        let h = harness(model, project);

        let outcome = h.executor.continue_chapter(id).await;
        assert_eq!(outcome, ActionOutcome::Completed);

        let chapter = h.store.snapshot().chapter(&id).unwrap().clone();
        assert_eq!(chapter.content, "Existing\n\nMore content");
        assert_eq!(chapter.status, ChapterStatus::Drafting);

        let last = h.executor.logs().pop().unwrap();
        assert_eq!(last.agent_name, AgentName::Writer);
        assert_eq!(last.message, "Added 12 chars");
    }

    #[tokio::test]
    async fn continue_replaces_empty_content() {
        let (project, id) = project_with_chapter("");
        let model = MockModel { text: "Opening line.".to_string(), ..MockModel::default() };
        let h = harness(model, project);

        h.executor.continue_chapter(id).await;

        assert_eq!(h.store.snapshot().chapter(&id).unwrap().content, "Opening line.");
    }

    #[tokio::test]
    async fn continue_failure_leaves_status() {
        let (project, id) = project_with_chapter("Existing");
        let h = harness(MockModel { fail_all: true, ..MockModel::default() }, project);

        let outcome = h.executor.continue_chapter(id).await;

        assert!(matches!(outcome, ActionOutcome::Failed { .. }));
        let chapter = h.store.snapshot().chapter(&id).unwrap().clone();
        assert_eq!(chapter.content, "Existing");
        assert_eq!(chapter.status, ChapterStatus::Pending);
    }

    // ── Log stream ───────────────────────────────────────────────────────────

    #[tokio::test]
    async fn add_log_preserves_call_order() {
        let h = harness(MockModel::default(), Project::new("idea", "noir"));

        h.executor.add_log(AgentName::System, "one", LogKind::Info);
        h.executor.add_log(AgentName::Planner, "two", LogKind::Thought);
        h.executor.add_log(AgentName::Writer, "three", LogKind::Success);

        let messages: Vec<String> = h.executor.logs().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
    }
}
