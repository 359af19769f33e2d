//! The parallel chapter writer.
//!
//! One batch drafts every unfinished chapter at once. Calls are fanned out
//! with a bounded `buffer_unordered`, so results are applied and logged in
//! completion order. A failed chapter never cancels its siblings.

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use quill_contracts::{
    action::{AgentAction, AgentName},
    error::QuillResult,
    execution::{ActionOutcome, BatchReport},
    log::LogKind,
    project::{ChapterBrief, ChapterId, ChapterStatus},
};

use crate::{executor::Executor, traits::update};

impl Executor {
    pub(crate) async fn write_chapters_parallel(
        &self,
        action: &AgentAction,
    ) -> QuillResult<ActionOutcome> {
        let project = self.store.snapshot();

        let mut pending: Vec<_> = project.chapters.iter().filter(|c| !c.is_complete()).collect();
        if pending.is_empty() {
            return Ok(self.skip("No pending chapters found."));
        }
        pending.sort_by_key(|c| c.order_index);

        let targets: Vec<(ChapterId, ChapterBrief)> = pending
            .into_iter()
            .map(|c| {
                let brief = ChapterBrief {
                    order_index: c.order_index,
                    title: c.title.clone(),
                    summary: c.summary.clone(),
                    premise: project.idea.clone(),
                };
                (c.id, brief)
            })
            .collect();

        let attempted = targets.len();
        let limit = self.settings.max_concurrency.unwrap_or(attempted).max(1);
        info!(action = %action.kind, chapters = attempted, limit, "batch starting");
        self.add_log(
            AgentName::Writer,
            format!("Drafting {attempted} chapters in parallel."),
            LogKind::Info,
        );

        let model = self.model.as_ref();
        let style = project.style.as_str();
        let mut drafts = stream::iter(targets)
            .map(|(id, brief)| async move {
                debug!(chapter = %id, order = brief.order_index, "chapter draft starting");
                let result = match model.write_chapter(&brief, style).await {
                    Ok(text) => self.check_text("write_chapter", &text).map(|()| text),
                    Err(err) => Err(err),
                };
                (id, brief, result)
            })
            .buffer_unordered(limit);

        let mut report = BatchReport { attempted, ..BatchReport::default() };
        while let Some((id, brief, result)) = drafts.next().await {
            match result {
                Ok(text) => {
                    update(self.store.as_ref(), |p| {
                        if let Some(c) = p.chapter_mut(&id) {
                            c.set_content(text);
                            c.status = ChapterStatus::Complete;
                        }
                        p.recount();
                    });
                    report.completed.push(id);
                    self.add_log(
                        AgentName::Writer,
                        format!("Chapter {} drafted: \"{}\".", brief.order_index, brief.title),
                        LogKind::Success,
                    );
                }
                Err(err) => {
                    warn!(chapter = %id, error = %err, "chapter draft failed");
                    report.failed.push(id);
                    self.add_log(
                        AgentName::Writer,
                        format!("Chapter {} failed: {err}", brief.order_index),
                        LogKind::Warning,
                    );
                }
            }
        }

        update(self.store.as_ref(), |p| {
            action.effects.apply_to(&mut p.world_state);
            p.recount();
        });

        let completed = report.completed.len();
        let failed = report.failed.len();
        info!(action = %action.kind, completed, failed, "batch settled");

        if completed == 0 {
            self.add_log(
                AgentName::System,
                format!("Action Failed: all {failed} chapter drafts failed."),
                LogKind::Error,
            );
        } else if failed == 0 {
            self.add_log(
                AgentName::Writer,
                format!("Batch complete: {completed} chapters drafted."),
                LogKind::Success,
            );
        } else {
            self.add_log(
                AgentName::Writer,
                format!("Batch finished: {completed} drafted, {failed} failed."),
                LogKind::Warning,
            );
        }

        let first_done = self
            .store
            .snapshot()
            .chapters
            .iter()
            .filter(|c| report.completed.contains(&c.id))
            .min_by_key(|c| c.order_index)
            .map(|c| c.id);
        if first_done.is_some() {
            self.store.select_chapter(first_done);
        }

        Ok(ActionOutcome::Batch(report))
    }
}
