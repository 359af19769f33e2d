//! Configuration file schema.
//!
//! Every section is optional; an empty document yields the defaults.
//!
//! ```toml
//! [autopilot]
//! interval_ms = 2000
//! max_actions = 10
//!
//! [writer]
//! max_concurrency = 4
//!
//! [journal]
//! capacity = 500
//!
//! [[costs]]
//! action = "deepen_plot"
//! cost = 7
//! ```

use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AutopilotSection {
    /// Milliseconds between ticks. Must be greater than zero.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Switch the autopilot off after this many executed actions.
    #[serde(default)]
    pub max_actions: Option<u32>,
}

impl Default for AutopilotSection {
    fn default() -> Self {
        Self { interval_ms: DEFAULT_INTERVAL_MS, max_actions: None }
    }
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterSection {
    /// Chapter drafts in flight at once. Omit the whole `[writer]` table for
    /// the default; set `unbounded = true` to lift the cap.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    #[serde(default)]
    pub unbounded: bool,
}

impl Default for WriterSection {
    fn default() -> Self {
        Self { max_concurrency: DEFAULT_MAX_CONCURRENCY, unbounded: false }
    }
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JournalSection {
    /// Entries retained before the oldest are dropped. Absent = unbounded.
    #[serde(default)]
    pub capacity: Option<usize>,
}

/// An autopilot cost override for one catalog action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CostOverride {
    /// Wire name of the action, e.g. `"deepen_plot"`.
    pub action: String,
    pub cost: u32,
}

/// The whole configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub autopilot: AutopilotSection,

    #[serde(default)]
    pub writer: WriterSection,

    #[serde(default)]
    pub journal: JournalSection,

    #[serde(default)]
    pub costs: Vec<CostOverride>,
}
