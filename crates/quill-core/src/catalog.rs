//! The action catalog and the availability checker.
//!
//! Availability has two layers, both of which must pass:
//!
//! 1. the static table: `matches(world_state, action.preconditions)`;
//! 2. the dynamic predicates in [`DYNAMIC_PREDICATES`], for conditions the
//!    table cannot express (e.g. "some chapter is not complete").

use quill_contracts::{
    action::{ActionKind, AgentAction, AgentMode},
    project::Project,
    world::WorldPatch,
};

/// A runtime condition attached to one action.
#[derive(Debug, Clone, Copy)]
pub struct DynamicPredicate {
    pub action: ActionKind,
    pub description: &'static str,
    pub check: fn(&Project) -> bool,
}

/// Every dynamic predicate, checked after the static table.
pub const DYNAMIC_PREDICATES: &[DynamicPredicate] = &[DynamicPredicate {
    action: ActionKind::WriteChapterParallel,
    description: "at least one chapter is not complete",
    check: has_unfinished_chapter,
}];

fn has_unfinished_chapter(project: &Project) -> bool {
    project.chapters.iter().any(|c| !c.is_complete())
}

const OUTLINED: WorldPatch = WorldPatch { has_outline: Some(true), ..WorldPatch::NONE };

const OUTLINED_WITH_CHAPTERS: WorldPatch = WorldPatch {
    has_outline: Some(true),
    chapters_count: Some(1),
    ..WorldPatch::NONE
};

/// The fixed table of seven actions, indexed by `ActionKind`.
#[derive(Debug, Clone)]
pub struct Catalog {
    actions: [AgentAction; 7],
}

impl Catalog {
    /// The standard catalog with default costs.
    pub fn standard() -> Self {
        Self {
            actions: [
                AgentAction {
                    kind: ActionKind::CreateOutline,
                    label: "Create Outline",
                    description: "Turn the premise into a titled, chapter-by-chapter plan.",
                    cost: 1,
                    preconditions: WorldPatch { has_outline: Some(false), ..WorldPatch::NONE },
                    effects: WorldPatch {
                        has_outline: Some(true),
                        has_title: Some(true),
                        ..WorldPatch::NONE
                    },
                    agent_mode: AgentMode::Planning,
                    prompt_template: "Outline a novel in the style of {style}: {idea}",
                },
                AgentAction {
                    kind: ActionKind::DeepenPlot,
                    label: "Deepen Plot",
                    description: "Add twists, subplots, and stakes to the premise.",
                    cost: 4,
                    preconditions: WorldPatch::NONE,
                    effects: WorldPatch::NONE,
                    agent_mode: AgentMode::Planning,
                    prompt_template: "Suggest plot enhancements for: {idea}",
                },
                AgentAction {
                    kind: ActionKind::DevelopCharacters,
                    label: "Develop Characters",
                    description: "Write profiles for the main cast.",
                    cost: 3,
                    preconditions: WorldPatch::NONE,
                    effects: WorldPatch { has_characters: Some(true), ..WorldPatch::NONE },
                    agent_mode: AgentMode::Planning,
                    prompt_template: "Create character profiles for: {idea}",
                },
                AgentAction {
                    kind: ActionKind::BuildWorld,
                    label: "Build World",
                    description: "Write the setting bible: places, history, rules.",
                    cost: 3,
                    preconditions: WorldPatch::NONE,
                    effects: WorldPatch { has_world_building: Some(true), ..WorldPatch::NONE },
                    agent_mode: AgentMode::Planning,
                    prompt_template: "Describe the world of: {idea}",
                },
                AgentAction {
                    kind: ActionKind::WriteChapterParallel,
                    label: "Write Chapters (Parallel)",
                    description: "Draft every unfinished chapter at once.",
                    cost: 2,
                    preconditions: OUTLINED_WITH_CHAPTERS,
                    effects: WorldPatch::NONE,
                    agent_mode: AgentMode::Drafting,
                    prompt_template: "Write chapter {order}: {title}. Summary: {summary}",
                },
                AgentAction {
                    kind: ActionKind::DialogueDoctor,
                    label: "Dialogue Doctor",
                    description: "Polish the dialogue of the selected chapter.",
                    cost: 5,
                    preconditions: OUTLINED_WITH_CHAPTERS,
                    effects: WorldPatch::NONE,
                    agent_mode: AgentMode::Editing,
                    prompt_template: "Improve the dialogue in: {content}",
                },
                AgentAction {
                    kind: ActionKind::EditorReview,
                    label: "Editor Review",
                    description: "Check the manuscript for continuity errors.",
                    cost: 6,
                    preconditions: OUTLINED,
                    effects: WorldPatch::NONE,
                    agent_mode: AgentMode::Editing,
                    prompt_template: "Review these chapters for consistency: {chapters}",
                },
            ],
        }
    }

    pub fn get(&self, kind: ActionKind) -> &AgentAction {
        &self.actions[kind as usize]
    }

    /// Override the autopilot cost of one action.
    pub fn set_cost(&mut self, kind: ActionKind, cost: u32) {
        self.actions[kind as usize].cost = cost;
    }

    /// All actions in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentAction> {
        self.actions.iter()
    }

    /// Actions currently legal for `project`, in catalog order.
    pub fn available(&self, project: &Project) -> Vec<&AgentAction> {
        self.iter().filter(|a| is_available(a, project)).collect()
    }

    /// The legal action with the lowest cost. Ties go to catalog order.
    pub fn cheapest_available(&self, project: &Project) -> Option<&AgentAction> {
        self.iter()
            .filter(|a| is_available(a, project))
            .min_by_key(|a| a.cost)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Return true if `action` may run against `project` right now.
pub fn is_available(action: &AgentAction, project: &Project) -> bool {
    project.world_state.satisfies(&action.preconditions)
        && DYNAMIC_PREDICATES
            .iter()
            .filter(|p| p.action == action.kind)
            .all(|p| (p.check)(project))
}
