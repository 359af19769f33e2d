//! The project aggregate: chapters, premise, and progress bookkeeping.
//!
//! The host application owns the `Project`. The engine only reads snapshots
//! and submits mutations through a store, so these types carry no behavior
//! beyond keeping their own derived counters consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::world::{WorldState, MAX_CHAPTERS};

/// Stable identifier for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub uuid::Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable identifier for a chapter within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(pub uuid::Uuid);

impl ChapterId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ChapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle of a single chapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChapterStatus {
    #[default]
    Pending,
    Drafting,
    Review,
    Complete,
}

/// One chapter of the manuscript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ChapterId,
    /// 1-based position in the manuscript. Stable ordering key.
    pub order_index: u32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub status: ChapterStatus,
    pub word_count: usize,
    pub char_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chapter {
    /// Create an empty, pending chapter.
    pub fn new(order_index: u32, title: impl Into<String>, summary: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ChapterId::new(),
            order_index,
            title: title.into(),
            summary: summary.into(),
            content: String::new(),
            status: ChapterStatus::Pending,
            word_count: 0,
            char_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the content and refresh the derived counters.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.word_count = self.content.split_whitespace().count();
        self.char_count = self.content.chars().count();
        self.updated_at = Utc::now();
    }

    pub fn is_complete(&self) -> bool {
        self.status == ChapterStatus::Complete
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// Running totals the engine maintains alongside the manuscript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalytics {
    pub total_words: usize,
    pub actions_completed: u64,
    pub actions_failed: u64,
}

/// The aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    /// Free-text premise. Planning actions append their output here.
    pub idea: String,
    /// Style or genre guidance passed to every generation call.
    pub style: String,
    pub world_state: WorldState,
    /// Ordered by `order_index`.
    pub chapters: Vec<Chapter>,
    /// Mirrors the engine lock so observers can render a busy indicator.
    pub is_generating: bool,
    pub analytics: ProjectAnalytics,
}

impl Project {
    pub fn new(idea: impl Into<String>, style: impl Into<String>) -> Self {
        let style = style.into();
        let world_state = WorldState {
            style_defined: !style.trim().is_empty(),
            ..WorldState::default()
        };
        Self {
            id: ProjectId::new(),
            title: String::new(),
            idea: idea.into(),
            style,
            world_state,
            chapters: Vec::new(),
            is_generating: false,
            analytics: ProjectAnalytics::default(),
        }
    }

    pub fn chapter(&self, id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| &c.id == id)
    }

    pub fn chapter_mut(&mut self, id: &ChapterId) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| &c.id == id)
    }

    /// Count of chapters whose status is complete.
    pub fn completed_chapters(&self) -> u32 {
        let n = self.chapters.iter().filter(|c| c.is_complete()).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Re-derive the chapter counters and analytics from the chapter list.
    pub fn recount(&mut self) {
        let count = u32::try_from(self.chapters.len()).unwrap_or(u32::MAX);
        self.world_state.chapters_count = count.min(MAX_CHAPTERS);
        self.world_state.chapters_completed =
            self.completed_chapters().min(self.world_state.chapters_count);
        self.analytics.total_words = self.chapters.iter().map(|c| c.word_count).sum();
    }
}

/// One entry of a generated outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineChapter {
    pub order_index: u32,
    pub title: String,
    pub summary: String,
}

/// The structured result of outline generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    pub title: String,
    pub chapters: Vec<OutlineChapter>,
}

/// Everything a chapter-writing call needs to know about its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterBrief {
    pub order_index: u32,
    pub title: String,
    pub summary: String,
    /// The project premise, including any appended planning material.
    pub premise: String,
}

/// Sampling and focus options for a refinement pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub preserve_length: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tone: Option<String>,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            top_p: 0.9,
            focus_areas: Vec::new(),
            preserve_length: true,
            target_tone: None,
        }
    }
}

impl RefineOptions {
    /// Check sampling parameters are within the ranges generation backends accept.
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} is outside 0.0..=2.0", self.temperature));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("top_p {} is outside 0.0..=1.0", self.top_p));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        Ok(())
    }
}
