//! Loading and validating an `EngineConfig`.
//!
//! A parsed document is validated once, up front. After that the conversion
//! methods are infallible, so the host can build an executor without further
//! error handling.

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use quill_contracts::{
    action::ActionKind,
    error::{QuillError, QuillResult},
};
use quill_core::{Catalog, EngineSettings};

use crate::schema::EngineConfig;

fn config_error(reason: impl Into<String>) -> QuillError {
    QuillError::ConfigError { reason: reason.into() }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// Returns `QuillError::ConfigError` if the TOML is malformed, has
    /// unknown keys, or fails `validate`.
    pub fn from_toml_str(s: &str) -> QuillResult<Self> {
        let config: EngineConfig = toml::from_str(s)
            .map_err(|e| config_error(format!("failed to parse engine TOML: {}", e)))?;
        config.validate()?;
        debug!(
            interval_ms = config.autopilot.interval_ms,
            max_concurrency = config.writer.max_concurrency,
            overrides = config.costs.len(),
            "engine config loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as engine configuration.
    pub fn from_file(path: &Path) -> QuillResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            config_error(format!("failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check every value the schema alone cannot constrain.
    pub fn validate(&self) -> QuillResult<()> {
        if self.autopilot.interval_ms == 0 {
            return Err(config_error("autopilot.interval_ms must be greater than zero"));
        }
        if self.autopilot.max_actions == Some(0) {
            return Err(config_error("autopilot.max_actions must be at least 1"));
        }
        if self.writer.max_concurrency == 0 {
            return Err(config_error("writer.max_concurrency must be at least 1"));
        }
        if self.journal.capacity == Some(0) {
            return Err(config_error("journal.capacity must be at least 1"));
        }
        for cost in &self.costs {
            cost.action
                .parse::<ActionKind>()
                .map_err(|e| config_error(format!("cost override: {e}")))?;
        }
        Ok(())
    }

    /// Executor tunables described by this config.
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            autopilot_interval: Duration::from_millis(self.autopilot.interval_ms),
            autopilot_max_actions: self.autopilot.max_actions,
            max_concurrency: (!self.writer.unbounded).then_some(self.writer.max_concurrency),
        }
    }

    /// The standard catalog with this config's cost overrides applied, in
    /// declaration order. Names were checked by `validate`; any that fail to
    /// parse here are skipped.
    pub fn catalog(&self) -> Catalog {
        let mut catalog = Catalog::standard();
        for cost in &self.costs {
            if let Ok(kind) = cost.action.parse::<ActionKind>() {
                catalog.set_cost(kind, cost.cost);
            }
        }
        catalog
    }

    pub fn journal_capacity(&self) -> Option<usize> {
        self.journal.capacity
    }
}
