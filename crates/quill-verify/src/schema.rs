//! JSON Schema documents for structured model output.

use serde_json::{json, Value};

use quill_contracts::world::MAX_CHAPTERS;

/// Schema for a generated `Outline`, in its camelCase wire form.
pub fn outline_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["title", "chapters"],
        "properties": {
            "title": { "type": "string" },
            "chapters": {
                "type": "array",
                "minItems": 1,
                "maxItems": MAX_CHAPTERS,
                "items": {
                    "type": "object",
                    "required": ["orderIndex", "title", "summary"],
                    "properties": {
                        "orderIndex": { "type": "integer", "minimum": 1 },
                        "title": { "type": "string" },
                        "summary": { "type": "string" }
                    }
                }
            }
        }
    })
}
