//! World state and the predicate evaluator.
//!
//! `WorldState` is the flat progress record every action reads and writes.
//! `WorldPatch` is its partial form, used both as an action's preconditions
//! (a pattern to match) and as its effects (a set of assignments to apply).

use serde::{Deserialize, Serialize};

/// Hard upper bound on the number of chapters a project may hold.
pub const MAX_CHAPTERS: u32 = 100;

/// A snapshot of project progress.
///
/// Invariant: `chapters_completed <= chapters_count <= MAX_CHAPTERS`, and both
/// counts agree with the chapter list they were derived from. The engine
/// restores the invariant with `Project::recount()` after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub has_title: bool,
    pub has_outline: bool,
    pub style_defined: bool,
    pub is_published: bool,
    pub has_characters: bool,
    pub has_world_building: bool,
    pub has_themes: bool,
    pub plot_structure_defined: bool,
    pub target_audience_defined: bool,
    pub chapters_count: u32,
    pub chapters_completed: u32,
}

impl WorldState {
    /// View this state as a fully populated patch.
    pub fn as_patch(&self) -> WorldPatch {
        WorldPatch {
            has_title: Some(self.has_title),
            has_outline: Some(self.has_outline),
            style_defined: Some(self.style_defined),
            is_published: Some(self.is_published),
            has_characters: Some(self.has_characters),
            has_world_building: Some(self.has_world_building),
            has_themes: Some(self.has_themes),
            plot_structure_defined: Some(self.plot_structure_defined),
            target_audience_defined: Some(self.target_audience_defined),
            chapters_count: Some(self.chapters_count),
            chapters_completed: Some(self.chapters_completed),
        }
    }

    /// Return true if `required` holds against this state.
    pub fn satisfies(&self, required: &WorldPatch) -> bool {
        matches(&self.as_patch(), required)
    }
}

/// A partial `WorldState`. `None` means "unconstrained" in a precondition
/// and "unchanged" in an effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_title: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_outline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_defined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_characters: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_world_building: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_themes: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot_structure_defined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience_defined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters_completed: Option<u32>,
}

impl WorldPatch {
    /// The empty patch: no constraint, no change.
    pub const NONE: WorldPatch = WorldPatch {
        has_title: None,
        has_outline: None,
        style_defined: None,
        is_published: None,
        has_characters: None,
        has_world_building: None,
        has_themes: None,
        plot_structure_defined: None,
        target_audience_defined: None,
        chapters_count: None,
        chapters_completed: None,
    };

    /// Return true if no key is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Assign every key present in this patch onto `state`.
    ///
    /// Counts are clamped so the result never exceeds `MAX_CHAPTERS` or lets
    /// `chapters_completed` overtake `chapters_count`.
    pub fn apply_to(&self, state: &mut WorldState) {
        fn set<T: Copy>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }

        set(&mut state.has_title, self.has_title);
        set(&mut state.has_outline, self.has_outline);
        set(&mut state.style_defined, self.style_defined);
        set(&mut state.is_published, self.is_published);
        set(&mut state.has_characters, self.has_characters);
        set(&mut state.has_world_building, self.has_world_building);
        set(&mut state.has_themes, self.has_themes);
        set(&mut state.plot_structure_defined, self.plot_structure_defined);
        set(&mut state.target_audience_defined, self.target_audience_defined);
        set(&mut state.chapters_count, self.chapters_count);
        set(&mut state.chapters_completed, self.chapters_completed);

        state.chapters_count = state.chapters_count.min(MAX_CHAPTERS);
        state.chapters_completed = state.chapters_completed.min(state.chapters_count);
    }
}

/// Evaluate `required` against `actual`.
///
/// For every key present in `required`:
/// - booleans must be exactly equal;
/// - counts are minimum thresholds: `actual >= required`.
///
/// A key that is required but missing from `actual` never matches. Keys
/// absent from `required` are unconstrained.
pub fn matches(actual: &WorldPatch, required: &WorldPatch) -> bool {
    fn flag(actual: Option<bool>, required: Option<bool>) -> bool {
        match required {
            None => true,
            Some(want) => actual == Some(want),
        }
    }

    fn at_least(actual: Option<u32>, required: Option<u32>) -> bool {
        match required {
            None => true,
            Some(min) => actual.is_some_and(|have| have >= min),
        }
    }

    flag(actual.has_title, required.has_title)
        && flag(actual.has_outline, required.has_outline)
        && flag(actual.style_defined, required.style_defined)
        && flag(actual.is_published, required.is_published)
        && flag(actual.has_characters, required.has_characters)
        && flag(actual.has_world_building, required.has_world_building)
        && flag(actual.has_themes, required.has_themes)
        && flag(actual.plot_structure_defined, required.plot_structure_defined)
        && flag(actual.target_audience_defined, required.target_audience_defined)
        && at_least(actual.chapters_count, required.chapters_count)
        && at_least(actual.chapters_completed, required.chapters_completed)
}
