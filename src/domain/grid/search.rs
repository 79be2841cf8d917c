//! Fallback full-record search.
//!
//! Used only when the caller did not supply its own search callback. Each
//! record is serialized and every top-level field is rendered to a string
//! and matched case-insensitively against the term.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// Returns true when `term` occurs (ignoring case) in any field of
/// `serialized`. An empty term matches everything.
pub fn matches_term(serialized: &JsonValue, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    match serialized {
        JsonValue::Object(fields) => fields
            .values()
            .any(|value| field_text(value).to_lowercase().contains(&needle)),
        other => field_text(other).to_lowercase().contains(&needle),
    }
}

/// Serializes and matches in one step.
///
/// Records that fail to serialize never match a non-empty term.
pub fn record_matches<T: Serialize>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    match serde_json::to_value(record) {
        Ok(value) => matches_term(&value, term),
        Err(e) => {
            tracing::warn!("Record could not be serialized for search: {}", e);
            false
        }
    }
}

/// String form of one field. Arrays join their items with commas, nested
/// objects fall back to compact JSON.
fn field_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items.iter().map(field_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}
