//! Error types for the QUILL engine.
//!
//! The engine never returns these to its callers from an action: they are
//! converted into log entries. They do cross the AI boundary, the verifier,
//! and configuration loading.

use thiserror::Error;

/// The unified error type for QUILL.
#[derive(Debug, Error)]
pub enum QuillError {
    /// A text-generation call failed.
    #[error("generation failed: {reason}")]
    Generation { reason: String },

    /// The verifier rejected a generated payload.
    #[error("output verification failed: {reason}")]
    VerificationFailed { reason: String },

    /// A generated payload cannot be applied to the project.
    #[error("invalid generated output: {reason}")]
    InvalidOutput { reason: String },

    /// Caller-supplied options are out of range.
    #[error("invalid options: {reason}")]
    InvalidOptions { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl QuillError {
    /// Shorthand for a generation failure.
    pub fn generation(reason: impl Into<String>) -> Self {
        QuillError::Generation { reason: reason.into() }
    }
}

/// Convenience alias used throughout the QUILL crates.
pub type QuillResult<T> = Result<T, QuillError>;
