//! Action catalog entry types.
//!
//! Actions are static: the catalog is built once and never grows or shrinks
//! at runtime. `ActionKind` is the key every dispatch matches on, so adding an
//! action is a compiler-checked change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::world::WorldPatch;

/// The seven catalog actions, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    CreateOutline,
    DeepenPlot,
    DevelopCharacters,
    BuildWorld,
    WriteChapterParallel,
    DialogueDoctor,
    EditorReview,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::CreateOutline,
        ActionKind::DeepenPlot,
        ActionKind::DevelopCharacters,
        ActionKind::BuildWorld,
        ActionKind::WriteChapterParallel,
        ActionKind::DialogueDoctor,
        ActionKind::EditorReview,
    ];

    /// The stable wire name, e.g. `"write_chapter_parallel"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CreateOutline => "create_outline",
            ActionKind::DeepenPlot => "deepen_plot",
            ActionKind::DevelopCharacters => "develop_characters",
            ActionKind::BuildWorld => "build_world",
            ActionKind::WriteChapterParallel => "write_chapter_parallel",
            ActionKind::DialogueDoctor => "dialogue_doctor",
            ActionKind::EditorReview => "editor_review",
        }
    }

    /// The persona credited with this action in the log stream.
    pub fn persona(&self) -> AgentName {
        match self {
            ActionKind::CreateOutline
            | ActionKind::DeepenPlot
            | ActionKind::DevelopCharacters
            | ActionKind::BuildWorld => AgentName::Architect,
            ActionKind::WriteChapterParallel => AgentName::Writer,
            ActionKind::DialogueDoctor => AgentName::Doctor,
            ActionKind::EditorReview => AgentName::Editor,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

/// Cosmetic classification shown next to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    Planning,
    Drafting,
    Editing,
}

/// The persona label attached to log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentName {
    Architect,
    Writer,
    Doctor,
    Editor,
    Planner,
    System,
}

impl AgentName {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentName::Architect => "Architect",
            AgentName::Writer => "Writer",
            AgentName::Doctor => "Doctor",
            AgentName::Editor => "Editor",
            AgentName::Planner => "Planner",
            AgentName::System => "System",
        }
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAction {
    #[serde(rename = "name")]
    pub kind: ActionKind,
    pub label: &'static str,
    pub description: &'static str,
    /// Lower is preferred when the autopilot chooses among legal actions.
    pub cost: u32,
    /// Static pattern the world state must match.
    pub preconditions: WorldPatch,
    /// Assignments applied to the world state after success.
    pub effects: WorldPatch,
    pub agent_mode: AgentMode,
    /// Informational only; the engine never renders it.
    pub prompt_template: &'static str,
}
