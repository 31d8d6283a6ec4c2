//! Block content classification
//!
//! Block values are opaque strings written by remote agents. Some are JSON,
//! most are prose. [`parse_block`] turns any string into a [`BlockContent`]
//! without ever failing, so callers never have to guess the shape.

use serde::Serialize;
use serde_json::Value;

/// A block value after classification
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum BlockContent {
    /// The value parsed as JSON (object, array or scalar)
    Structured(Value),
    /// Anything else, kept verbatim
    Raw(String),
}

/// Classify a block value. Total: every input yields a value.
pub fn parse_block(value: &str) -> BlockContent {
    match serde_json::from_str::<Value>(value.trim()) {
        Ok(parsed) => BlockContent::Structured(parsed),
        Err(_) => BlockContent::Raw(value.to_string()),
    }
}

impl BlockContent {
    /// True for parsed JSON
    pub fn is_structured(&self) -> bool {
        matches!(self, BlockContent::Structured(_))
    }

    /// Top-level object keys (e.g. firm names); empty for anything but an object
    pub fn keys(&self) -> Vec<String> {
        match self {
            BlockContent::Structured(Value::Object(map)) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Number of entries: array length, object size, or non-blank raw lines
    pub fn item_count(&self) -> usize {
        match self {
            BlockContent::Structured(Value::Array(items)) => items.len(),
            BlockContent::Structured(Value::Object(map)) => map.len(),
            BlockContent::Structured(Value::Null) => 0,
            BlockContent::Structured(_) => 1,
            BlockContent::Raw(text) => text.lines().filter(|l| !l.trim().is_empty()).count(),
        }
    }

    /// At most `max_chars` characters for display. Raw text is cut as is;
    /// structured content is rendered as compact JSON first.
    pub fn preview(&self, max_chars: usize) -> String {
        let rendered = match self {
            BlockContent::Structured(value) => value.to_string(),
            BlockContent::Raw(text) => text.clone(),
        };
        if rendered.chars().count() <= max_chars {
            rendered
        } else {
            let mut cut: String = rendered.chars().take(max_chars).collect();
            cut.push('…');
            cut
        }
    }
}
