//! `ScriptedModel`: a deterministic, offline `StoryModel`.
//!
//! Returns the canned material from [`mock_data`](crate::mock_data) after an
//! optional simulated latency. Failures can be injected per chapter so the
//! scenarios can show batch isolation and retry.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use quill_contracts::{
    error::{QuillError, QuillResult},
    project::{Chapter, ChapterBrief, Outline, RefineOptions},
};
use quill_core::traits::StoryModel;

use crate::mock_data;

pub struct ScriptedModel {
    latency: Option<Duration>,
    fail_once: Mutex<HashSet<u32>>,
    calls: AtomicU64,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self { latency: None, fail_once: Mutex::new(HashSet::new()), calls: AtomicU64::new(0) }
    }

    /// Sleep this long before every response.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make the next draft of chapter `order_index` fail. Later drafts succeed.
    pub fn fail_chapter_once(self, order_index: u32) -> Self {
        self.fail_once
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order_index);
        self
    }

    /// Number of model calls served so far, failed ones included.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn respond(&self, call: &str) {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(call, n, "scripted model call");
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for ScriptedModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoryModel for ScriptedModel {
    async fn generate_outline(&self, _idea: &str, _style: &str) -> QuillResult<Outline> {
        self.respond("generate_outline").await;
        Ok(mock_data::outline())
    }

    async fn build_world(&self, _idea: &str, _style: &str) -> QuillResult<String> {
        self.respond("build_world").await;
        Ok(mock_data::world_notes())
    }

    async fn develop_characters(&self, _idea: &str, _style: &str) -> QuillResult<String> {
        self.respond("develop_characters").await;
        Ok(mock_data::character_profiles())
    }

    async fn write_chapter(&self, brief: &ChapterBrief, _style: &str) -> QuillResult<String> {
        self.respond("write_chapter").await;
        let injected = self
            .fail_once
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&brief.order_index);
        if injected {
            return Err(QuillError::generation(format!(
                "upstream timeout while drafting chapter {}",
                brief.order_index
            )));
        }
        Ok(mock_data::chapter_prose(brief.order_index, &brief.title, &brief.summary))
    }

    async fn polish_dialogue(&self, content: &str, _style: &str) -> QuillResult<String> {
        self.respond("polish_dialogue").await;
        Ok(mock_data::polish_dialogue(content))
    }

    async fn analyze_consistency(&self, chapters: &[Chapter], _style: &str) -> QuillResult<String> {
        self.respond("analyze_consistency").await;
        Ok(mock_data::consistency_report(chapters))
    }

    async fn refine_chapter(
        &self,
        content: &str,
        _summary: &str,
        _style: &str,
        options: &RefineOptions,
    ) -> QuillResult<String> {
        self.respond("refine_chapter").await;
        Ok(mock_data::refined(content, options.target_tone.as_deref()))
    }

    async fn continue_writing(
        &self,
        _content: &str,
        summary: &str,
        _style: &str,
    ) -> QuillResult<String> {
        self.respond("continue_writing").await;
        Ok(mock_data::continuation(summary))
    }
}
