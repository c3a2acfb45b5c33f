//! Dot-path lookup over JSON documents, shared by the permission matcher
//! (inbound payloads) and the token issuer (user entity projection).

use serde_json::Value;

/// Resolves a dot-delimited path against a JSON document.
///
/// Returns `None` when a key is missing or an intermediate value is not an
/// object. A present-but-null leaf resolves to `Some(&Value::Null)`, which is
/// distinct from not-found; callers decide how null is treated.
pub fn resolve<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Renders a payload value for comparison against stored param values:
/// strings compare raw, other scalars by their JSON display form.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
