//! Deterministic cache-key derivation
//!
//! A key is the md5 hex digest of `operation:canonical-params`, where the
//! canonical form serializes all object keys in lexicographic order at
//! every nesting level. Two requests with the same operation and parameter
//! values therefore produce the same key regardless of how the parameter
//! mapping was built.

use serde_json::Value;
use std::collections::BTreeMap;

/// Derive a cache key from an operation name and its parameters
///
/// Pure and deterministic: no I/O, no randomness, no dependence on map
/// iteration order. Values of different JSON types (e.g. the number `5`
/// and the string `"5"`) canonicalize differently and yield different
/// keys; typed requests keep the string form from ever reaching here.
pub fn derive_key(operation: &str, params: &Value) -> String {
    let canonical = canonicalize(params).to_string();
    let input = format!("{}:{}", operation, canonical);
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Rebuild a JSON value with object keys sorted recursively
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, Value> =
                map.iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(
                sorted
                    .into_iter()
                    .map(|(k, v)| (k.clone(), v))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
