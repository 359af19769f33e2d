//! Hand-written mocks shared by the core test modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;

use quill_contracts::{
    action::AgentName,
    error::{QuillError, QuillResult},
    log::{LogEntry, LogKind},
    project::{Chapter, ChapterBrief, Outline, OutlineChapter, Project, RefineOptions},
    verify::{VerificationFailure, VerificationReport},
};

use crate::{
    executor::Executor,
    store::InMemoryProjectStore,
    traits::{Journal, OutputVerifier, StoryModel},
};

// ── Model ────────────────────────────────────────────────────────────────────

/// Records every call as a string, e.g. `"write_chapter:Frost"`.
pub struct MockModel {
    pub outline: Option<Outline>,
    /// Returned by every free-text call.
    pub text: String,
    pub fail_all: bool,
    /// Chapter titles whose draft call fails.
    pub fail_chapters: Vec<String>,
    /// When set, every call waits for a notification before returning.
    pub gate: Option<Arc<Notify>>,
    pub latency: Option<Duration>,
    /// Extra delay for the draft of a given chapter title.
    pub chapter_latency: Vec<(String, Duration)>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub in_flight: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self {
            outline: None,
            text: "Generated text.".to_string(),
            fail_all: false,
            fail_chapters: Vec::new(),
            gate: None,
            latency: None,
            chapter_latency: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockModel {
    async fn enter(&self, call: String) -> QuillResult<()> {
        self.calls.lock().unwrap().push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_all {
            return Err(QuillError::generation("mock failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl StoryModel for MockModel {
    async fn generate_outline(&self, _idea: &str, _style: &str) -> QuillResult<Outline> {
        self.enter("generate_outline".to_string()).await?;
        Ok(self.outline.clone().unwrap_or_else(|| outline_of("Untitled", &["One"])))
    }

    async fn build_world(&self, _idea: &str, _style: &str) -> QuillResult<String> {
        self.enter("build_world".to_string()).await?;
        Ok(self.text.clone())
    }

    async fn develop_characters(&self, _idea: &str, _style: &str) -> QuillResult<String> {
        self.enter("develop_characters".to_string()).await?;
        Ok(self.text.clone())
    }

    async fn write_chapter(&self, brief: &ChapterBrief, _style: &str) -> QuillResult<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some((_, delay)) = self.chapter_latency.iter().find(|(t, _)| *t == brief.title) {
            tokio::time::sleep(*delay).await;
        }
        let entered = self.enter(format!("write_chapter:{}", brief.title)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        entered?;

        if self.fail_chapters.contains(&brief.title) {
            return Err(QuillError::generation(format!("mock failure for {}", brief.title)));
        }
        Ok(format!("Chapter {} prose for {}.", brief.order_index, brief.title))
    }

    async fn polish_dialogue(&self, _content: &str, _style: &str) -> QuillResult<String> {
        self.enter("polish_dialogue".to_string()).await?;
        Ok(self.text.clone())
    }

    async fn analyze_consistency(
        &self,
        _chapters: &[Chapter],
        _style: &str,
    ) -> QuillResult<String> {
        self.enter("analyze_consistency".to_string()).await?;
        Ok(self.text.clone())
    }

    async fn refine_chapter(
        &self,
        content: &str,
        _summary: &str,
        _style: &str,
        _options: &RefineOptions,
    ) -> QuillResult<String> {
        self.enter(format!("refine_chapter:{content}")).await?;
        Ok(self.text.clone())
    }

    async fn continue_writing(
        &self,
        _content: &str,
        _summary: &str,
        _style: &str,
    ) -> QuillResult<String> {
        self.enter("continue_writing".to_string()).await?;
        Ok(self.text.clone())
    }
}

pub fn outline_of(title: &str, chapters: &[&str]) -> Outline {
    Outline {
        title: title.to_string(),
        chapters: chapters
            .iter()
            .enumerate()
            .map(|(i, t)| OutlineChapter {
                order_index: i as u32 + 1,
                title: t.to_string(),
                summary: format!("{t} happens"),
            })
            .collect(),
    }
}

// ── Journal ──────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryJournal {
    entries: Mutex<Vec<LogEntry>>,
}

impl Journal for MemoryJournal {
    fn append(&self, agent: AgentName, message: String, kind: LogKind) -> LogEntry {
        let mut entries = self.entries.lock().unwrap();
        let entry = LogEntry {
            id: entries.len() as u64,
            timestamp: Utc::now(),
            agent_name: agent,
            message,
            kind,
            level: kind.level(),
        };
        entries.push(entry.clone());
        entry
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

// ── Verifier ─────────────────────────────────────────────────────────────────

/// Fails every payload.
pub struct RejectingVerifier;

impl RejectingVerifier {
    fn report() -> VerificationReport {
        VerificationReport::from_failures(vec![VerificationFailure {
            rule_id: "always-reject".to_string(),
            message: "rejected by test verifier".to_string(),
        }])
    }
}

impl OutputVerifier for RejectingVerifier {
    fn verify_outline(&self, _outline: &Outline) -> QuillResult<VerificationReport> {
        Ok(Self::report())
    }

    fn verify_text(&self, _purpose: &str, _text: &str) -> QuillResult<VerificationReport> {
        Ok(Self::report())
    }
}

// ── Harness ──────────────────────────────────────────────────────────────────

pub struct Harness {
    pub executor: Executor,
    pub store: Arc<InMemoryProjectStore>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub peak: Arc<AtomicUsize>,
}

pub fn harness(model: MockModel, project: Project) -> Harness {
    let calls = model.calls.clone();
    let peak = model.peak.clone();
    let store = Arc::new(InMemoryProjectStore::new(project));
    let journal = Arc::new(MemoryJournal::default());
    let executor = Executor::new(Arc::new(model), store.clone(), journal);
    Harness { executor, store, calls, peak }
}
