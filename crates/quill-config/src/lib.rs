//! # quill-config
//!
//! TOML configuration for the QUILL engine: autopilot pacing, the batch
//! writer's concurrency cap, journal retention, and action cost overrides.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use quill_config::EngineConfig;
//!
//! let config = EngineConfig::from_file(Path::new("config/studio.toml"))?;
//! let executor = Executor::new(model, store, journal)
//!     .with_settings(config.settings())
//!     .with_catalog(config.catalog());
//! ```
//!
//! Preconditions and effects are fixed; only costs can be overridden.

pub mod loader;
pub mod schema;

pub use schema::EngineConfig;
