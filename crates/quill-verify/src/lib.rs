//! # quill-verify
//!
//! Output verification for the QUILL engine.
//!
//! This crate provides [`engine::SchemaVerifier`], which implements the
//! [`quill_core::traits::OutputVerifier`] trait. Generated outlines are
//! validated structurally (JSON Schema via `jsonschema`) and semantically;
//! generated prose must be non-blank and free of forbidden patterns.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use quill_verify::engine::SchemaVerifier;
//!
//! let verifier = SchemaVerifier::new().forbid("lorem ipsum");
//! let executor = Executor::new(model, store, journal).with_verifier(Box::new(verifier));
//! ```

pub mod engine;
pub mod schema;

pub use engine::SchemaVerifier;
