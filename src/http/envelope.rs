//! Response envelope normalization
//!
//! A server using reference-preserving JSON serialization wraps collections
//! as `{"$id": "1", "$values": [...]}` instead of a bare array. Every
//! collection read by a scenario goes through [`into_values`] so callers only
//! ever see the plain shape.

use serde_json::Value;

/// Key under which a reference-wrapped collection keeps its items
pub const VALUES_KEY: &str = "$values";

/// Resolve a body to its plain sequence of items
///
/// - `{"$values": x, ...}` resolves to `x`, itself resolved again
/// - `[...]` is returned unchanged
/// - `null` is an empty sequence
/// - any other value becomes a one-element sequence
///
/// Idempotent: resolving an already resolved sequence returns it unchanged.
pub fn into_values(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(mut map) => match map.remove(VALUES_KEY) {
            Some(inner) => into_values(inner),
            None => vec![Value::Object(map)],
        },
        other => vec![other],
    }
}

/// Borrowing variant of [`into_values`]
pub fn values(value: &Value) -> Vec<Value> {
    into_values(value.clone())
}
