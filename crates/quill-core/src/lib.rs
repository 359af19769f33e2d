//! # quill-core
//!
//! The goal-oriented action planning engine behind QUILL.
//!
//! This crate provides:
//! - The four boundary traits (`StoryModel`, `ProjectStore`, `Journal`, `OutputVerifier`)
//! - The action `Catalog` and the availability checker
//! - The `Executor`: single actions, the parallel chapter writer, and the autopilot
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quill_core::{Executor, InMemoryProjectStore, traits::{StoryModel, Journal}};
//! ```

pub mod autopilot;
pub mod catalog;
pub mod executor;
pub mod store;
pub mod traits;
mod writer;

#[cfg(test)]
mod test_support;

pub use autopilot::TickOutcome;
pub use catalog::Catalog;
pub use executor::{EngineSettings, Executor};
pub use store::InMemoryProjectStore;
