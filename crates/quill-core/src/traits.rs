//! Core trait definitions for the QUILL engine.
//!
//! These four traits are the engine's whole view of the outside world:
//!
//! - `StoryModel`      : the AI text-generation boundary (untrusted, fallible)
//! - `ProjectStore`    : where the host keeps the project and chapter selection
//! - `Journal`         : the append-only progress log
//! - `OutputVerifier`  : optional checks on generated payloads
//!
//! The executor never holds its own copy of the project across an await; it
//! reads a snapshot, calls the model, and submits one mutation to the store.

use async_trait::async_trait;

use quill_contracts::{
    action::AgentName,
    error::QuillResult,
    log::{LogEntry, LogKind},
    project::{Chapter, ChapterBrief, ChapterId, Outline, Project, RefineOptions},
    verify::VerificationReport,
};

/// The AI text-generation boundary.
///
/// Every call may fail; the executor turns failures into log entries and
/// leaves the project untouched.
#[async_trait]
pub trait StoryModel: Send + Sync {
    /// Produce a title and chapter plan for the premise.
    async fn generate_outline(&self, idea: &str, style: &str) -> QuillResult<Outline>;

    /// Produce world-building notes. Also used to deepen the plot.
    async fn build_world(&self, idea: &str, style: &str) -> QuillResult<String>;

    /// Produce character profiles.
    async fn develop_characters(&self, idea: &str, style: &str) -> QuillResult<String>;

    /// Draft the full text of one chapter.
    async fn write_chapter(&self, brief: &ChapterBrief, style: &str) -> QuillResult<String>;

    /// Rewrite the dialogue in `content`, returning the whole chapter.
    async fn polish_dialogue(&self, content: &str, style: &str) -> QuillResult<String>;

    /// Review the manuscript for continuity problems. Read-only.
    async fn analyze_consistency(&self, chapters: &[Chapter], style: &str) -> QuillResult<String>;

    /// Rewrite `content` according to `options`, returning the whole chapter.
    async fn refine_chapter(
        &self,
        content: &str,
        summary: &str,
        style: &str,
        options: &RefineOptions,
    ) -> QuillResult<String>;

    /// Produce new text that continues `content`. Returns only the new text.
    async fn continue_writing(
        &self,
        content: &str,
        summary: &str,
        style: &str,
    ) -> QuillResult<String>;
}

/// The host-owned home of the project.
///
/// All engine mutations funnel through `apply`, so the host decides how a
/// change is published (re-render, persist, broadcast).
pub trait ProjectStore: Send + Sync {
    /// Return a copy of the current project.
    fn snapshot(&self) -> Project;

    /// Mutate the project in place. Implementations must call `update`
    /// exactly once.
    fn apply(&self, update: &mut dyn FnMut(&mut Project));

    /// The chapter the user is currently looking at, if any.
    fn selected_chapter(&self) -> Option<ChapterId>;

    /// Move the selection. The engine selects a chapter after it edits one.
    fn select_chapter(&self, id: Option<ChapterId>);
}

/// Run a one-shot mutation through `store.apply`.
pub fn update(store: &dyn ProjectStore, f: impl FnOnce(&mut Project)) {
    let mut f = Some(f);
    store.apply(&mut |project| {
        if let Some(f) = f.take() {
            f(project);
        }
    });
}

/// The append-only progress log.
///
/// Appends may arrive from several in-flight chapter drafts; implementations
/// must make each append atomic.
pub trait Journal: Send + Sync {
    /// Append one entry and return it as stored.
    fn append(&self, agent: AgentName, message: String, kind: LogKind) -> LogEntry;

    /// All retained entries, oldest first.
    fn entries(&self) -> Vec<LogEntry>;
}

/// Checks generated payloads before they touch the project.
///
/// A failing report is treated exactly like a failed AI call.
pub trait OutputVerifier: Send + Sync {
    /// Verify a generated outline.
    fn verify_outline(&self, outline: &Outline) -> QuillResult<VerificationReport>;

    /// Verify generated prose. `purpose` names what the text is for, e.g.
    /// the action name, and appears in failure messages.
    fn verify_text(&self, purpose: &str, text: &str) -> QuillResult<VerificationReport>;
}
