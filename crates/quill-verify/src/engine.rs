//! Schema-based output verifier for the QUILL engine.
//!
//! `SchemaVerifier` implements the `OutputVerifier` trait from `quill-core`.
//! Outlines are checked in two phases:
//!
//! 1. **Structural**: the outline's wire form is validated against
//!    [`outline_schema`](crate::schema::outline_schema) with `jsonschema`.
//! 2. **Semantic**: non-blank titles and unique order indices.
//!
//! Prose is checked for blankness, forbidden substrings, and any custom
//! rules the host registered. All failures are collected before returning.

use std::collections::HashMap;

use tracing::{debug, warn};

use quill_contracts::{
    error::{QuillError, QuillResult},
    project::Outline,
    verify::{VerificationFailure, VerificationReport},
};
use quill_core::traits::OutputVerifier;

use crate::schema::outline_schema;

/// A host-supplied prose check.
///
/// Receives the purpose (e.g. `"write_chapter"`) and the text. Returns
/// `Some(message)` when the check fails.
pub type TextRuleFn = Box<dyn Fn(&str, &str) -> Option<String> + Send + Sync>;

fn failure(rule_id: &str, message: impl Into<String>) -> VerificationFailure {
    VerificationFailure { rule_id: rule_id.to_string(), message: message.into() }
}

/// The QUILL output verifier.
pub struct SchemaVerifier {
    forbidden: Vec<String>,
    custom_rules: HashMap<String, TextRuleFn>,
}

impl SchemaVerifier {
    pub fn new() -> Self {
        Self { forbidden: Vec::new(), custom_rules: HashMap::new() }
    }

    /// Reject any generated text containing `pattern`, case-insensitively.
    pub fn forbid(mut self, pattern: impl Into<String>) -> Self {
        self.forbidden.push(pattern.into().to_lowercase());
        self
    }

    /// Register a custom prose check under `name`. Registering the same name
    /// twice replaces the previous function.
    pub fn register_rule(&mut self, name: impl Into<String>, f: TextRuleFn) {
        self.custom_rules.insert(name.into(), f);
    }

    fn structural_failures(outline: &Outline) -> QuillResult<Vec<VerificationFailure>> {
        let payload = serde_json::to_value(outline).map_err(|e| QuillError::InvalidOutput {
            reason: format!("outline is not serializable: {e}"),
        })?;

        let failures = match jsonschema::validator_for(&outline_schema()) {
            Ok(validator) => validator
                .iter_errors(&payload)
                .map(|error| {
                    let message =
                        format!("JSON Schema violation at {}: {}", error.instance_path, error);
                    warn!(%message, "structural validation failure");
                    failure("json-schema", message)
                })
                .collect(),
            Err(e) => vec![failure("json-schema", format!("invalid JSON Schema document: {e}"))],
        };
        Ok(failures)
    }

    fn semantic_failures(outline: &Outline) -> Vec<VerificationFailure> {
        let mut failures = Vec::new();

        if outline.title.trim().is_empty() {
            failures.push(failure("outline-title", "outline title is blank"));
        }

        let mut seen = std::collections::HashSet::new();
        for chapter in &outline.chapters {
            if chapter.title.trim().is_empty() {
                failures.push(failure(
                    "chapter-title",
                    format!("chapter {} has a blank title", chapter.order_index),
                ));
            }
            if !seen.insert(chapter.order_index) {
                failures.push(failure(
                    "order-index-unique",
                    format!("order index {} appears more than once", chapter.order_index),
                ));
            }
        }

        failures
    }
}

impl Default for SchemaVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputVerifier for SchemaVerifier {
    fn verify_outline(&self, outline: &Outline) -> QuillResult<VerificationReport> {
        let mut failures = Self::structural_failures(outline)?;
        failures.extend(Self::semantic_failures(outline));

        for f in &failures {
            warn!(rule_id = %f.rule_id, message = %f.message, "outline rule failed");
        }
        debug!(passed = failures.is_empty(), failure_count = failures.len(), "outline verified");
        Ok(VerificationReport::from_failures(failures))
    }

    fn verify_text(&self, purpose: &str, text: &str) -> QuillResult<VerificationReport> {
        let mut failures = Vec::new();

        if text.trim().is_empty() {
            failures.push(failure("text-blank", format!("{purpose} returned blank text")));
        }

        let lowered = text.to_lowercase();
        for pattern in &self.forbidden {
            if lowered.contains(pattern.as_str()) {
                failures.push(failure(
                    "forbidden-pattern",
                    format!("{purpose} output contains forbidden pattern '{pattern}'"),
                ));
            }
        }

        let mut names: Vec<&String> = self.custom_rules.keys().collect();
        names.sort();
        for name in names {
            if let Some(message) = self.custom_rules.get(name).and_then(|f| f(purpose, text)) {
                failures.push(failure(name, message));
            }
        }

        for f in &failures {
            warn!(purpose, rule_id = %f.rule_id, message = %f.message, "text rule failed");
        }
        debug!(purpose, passed = failures.is_empty(), "text verified");
        Ok(VerificationReport::from_failures(failures))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
