//! # quill-contracts
//!
//! Shared types, schemas, and contracts for the QUILL writing engine.
//!
//! All crates in the workspace import from here. Apart from the pure
//! precondition evaluator in [`world`], no engine logic lives in this crate,
//! only data definitions and error types.

pub mod action;
pub mod error;
pub mod execution;
pub mod log;
pub mod project;
pub mod verify;
pub mod world;

#[cfg(test)]
mod tests {
    use super::*;
    use action::{ActionKind, AgentName};
    use error::QuillError;
    use execution::{Activity, ExecutionState};
    use log::{LogKind, LogLevel};
    use project::{Chapter, ChapterStatus, Project, RefineOptions};
    use world::{matches, WorldPatch, WorldState, MAX_CHAPTERS};

    // ── Predicate evaluator ──────────────────────────────────────────────────

    #[test]
    fn empty_requirement_matches_anything() {
        assert!(matches(&WorldPatch::NONE, &WorldPatch::NONE));
        assert!(WorldState::default().satisfies(&WorldPatch::NONE));
    }

    #[test]
    fn boolean_requirement_is_exact() {
        let required = WorldPatch { has_outline: Some(false), ..WorldPatch::NONE };

        let mut state = WorldState::default();
        assert!(state.satisfies(&required));

        state.has_outline = true;
        assert!(!state.satisfies(&required));
    }

    #[test]
    fn numeric_requirement_is_a_minimum() {
        let required = WorldPatch { chapters_count: Some(1), ..WorldPatch::NONE };

        let mut state = WorldState::default();
        assert!(!state.satisfies(&required), "0 chapters is below the threshold");

        state.chapters_count = 1;
        assert!(state.satisfies(&required));

        state.chapters_count = 12;
        assert!(state.satisfies(&required), "more than required still matches");
    }

    #[test]
    fn required_key_missing_from_actual_fails() {
        let actual = WorldPatch { has_title: Some(true), ..WorldPatch::NONE };

        let needs_flag = WorldPatch { has_outline: Some(false), ..WorldPatch::NONE };
        let needs_count = WorldPatch { chapters_count: Some(0), ..WorldPatch::NONE };

        assert!(!matches(&actual, &needs_flag));
        assert!(!matches(&actual, &needs_count));
    }

    #[test]
    fn mixed_requirement_needs_every_key() {
        let required = WorldPatch {
            has_outline: Some(true),
            chapters_count: Some(1),
            ..WorldPatch::NONE
        };

        let outline_only = WorldState { has_outline: true, ..WorldState::default() };
        assert!(!outline_only.satisfies(&required));

        let both = WorldState { has_outline: true, chapters_count: 3, ..WorldState::default() };
        assert!(both.satisfies(&required));
    }

    // ── Effects ──────────────────────────────────────────────────────────────

    #[test]
    fn apply_sets_only_present_keys() {
        let mut state = WorldState { has_themes: true, ..WorldState::default() };
        let effects = WorldPatch {
            has_outline: Some(true),
            has_title: Some(true),
            ..WorldPatch::NONE
        };

        effects.apply_to(&mut state);

        assert!(state.has_outline);
        assert!(state.has_title);
        assert!(state.has_themes, "untouched keys keep their value");
        assert!(WorldPatch::NONE.is_empty());
        assert!(!effects.is_empty());
    }

    #[test]
    fn apply_clamps_counts() {
        let mut state = WorldState::default();
        WorldPatch {
            chapters_count: Some(500),
            chapters_completed: Some(900),
            ..WorldPatch::NONE
        }
        .apply_to(&mut state);

        assert_eq!(state.chapters_count, MAX_CHAPTERS);
        assert_eq!(state.chapters_completed, MAX_CHAPTERS);
    }

    // ── Chapters and projects ────────────────────────────────────────────────

    #[test]
    fn set_content_refreshes_counts() {
        let mut chapter = Chapter::new(1, "Opening", "The storm arrives");
        assert_eq!(chapter.status, ChapterStatus::Pending);
        assert!(!chapter.has_content());

        chapter.set_content("Rain fell on the harbor.");
        assert_eq!(chapter.word_count, 5);
        assert_eq!(chapter.char_count, 24);
        assert!(chapter.updated_at >= chapter.created_at);
    }

    #[test]
    fn recount_tracks_chapter_list() {
        let mut project = Project::new("A lighthouse keeper finds a map", "gothic");
        assert!(project.world_state.style_defined);

        let mut done = Chapter::new(1, "One", "");
        done.set_content("three words here");
        done.status = ChapterStatus::Complete;
        project.chapters = vec![done, Chapter::new(2, "Two", "")];

        project.recount();

        assert_eq!(project.world_state.chapters_count, 2);
        assert_eq!(project.world_state.chapters_completed, 1);
        assert_eq!(project.analytics.total_words, 3);
    }

    #[test]
    fn blank_style_is_not_defined() {
        let project = Project::new("idea", "   ");
        assert!(!project.world_state.style_defined);
    }

    // ── Actions ──────────────────────────────────────────────────────────────

    #[test]
    fn action_kind_parses_its_own_name() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!("summon_muse".parse::<ActionKind>().is_err());
    }

    #[test]
    fn action_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ActionKind::WriteChapterParallel).unwrap();
        assert_eq!(json, "\"write_chapter_parallel\"");
    }

    #[test]
    fn personas_match_their_roles() {
        assert_eq!(ActionKind::CreateOutline.persona(), AgentName::Architect);
        assert_eq!(ActionKind::WriteChapterParallel.persona(), AgentName::Writer);
        assert_eq!(ActionKind::DialogueDoctor.persona(), AgentName::Doctor);
        assert_eq!(ActionKind::EditorReview.persona(), AgentName::Editor);
    }

    // ── Execution state ──────────────────────────────────────────────────────

    #[test]
    fn busy_state_reports_its_action() {
        assert!(!ExecutionState::Idle.is_busy());
        assert_eq!(ExecutionState::Idle.current_action(), None);

        let busy = ExecutionState::Busy(Activity::Action(ActionKind::BuildWorld));
        assert!(busy.is_busy());
        assert_eq!(busy.current_action(), Some(ActionKind::BuildWorld));

        let refining = ExecutionState::Busy(Activity::Refine(project::ChapterId::new()));
        assert!(refining.is_busy());
        assert_eq!(refining.current_action(), None);
    }

    // ── Log kinds ────────────────────────────────────────────────────────────

    #[test]
    fn log_kind_levels() {
        assert_eq!(LogKind::Thought.level(), LogLevel::Debug);
        assert_eq!(LogKind::Success.level(), LogLevel::Info);
        assert_eq!(LogKind::Warning.level(), LogLevel::Warn);
        assert_eq!(LogKind::Error.level(), LogLevel::Error);
    }

    // ── Refine options ───────────────────────────────────────────────────────

    #[test]
    fn refine_options_default_is_valid() {
        assert!(RefineOptions::default().validate().is_ok());
    }

    #[test]
    fn refine_options_reject_out_of_range() {
        let hot = RefineOptions { temperature: 3.5, ..RefineOptions::default() };
        assert!(hot.validate().unwrap_err().contains("temperature"));

        let wide = RefineOptions { top_p: 1.5, ..RefineOptions::default() };
        assert!(wide.validate().unwrap_err().contains("top_p"));

        let mute = RefineOptions { max_tokens: 0, ..RefineOptions::default() };
        assert!(mute.validate().unwrap_err().contains("max_tokens"));
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_generation_display() {
        let msg = QuillError::generation("rate limited").to_string();
        assert!(msg.contains("generation failed"));
        assert!(msg.contains("rate limited"));
    }

    #[test]
    fn error_verification_failed_display() {
        let err = QuillError::VerificationFailed { reason: "[outline-title] blank".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("verification failed"));
        assert!(msg.contains("outline-title"));
    }

    #[test]
    fn error_config_error_display() {
        let err = QuillError::ConfigError { reason: "interval_ms must be > 0".to_string() };
        assert!(err.to_string().contains("configuration error"));
    }
}
