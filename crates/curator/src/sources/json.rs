//! Small helpers for pulling cells out of provider JSON.

use serde_json::Value;

/// Follow `path` through nested objects and render the leaf as a cell.
///
/// Strings come back as-is, numbers in their JSON spelling; null, missing
/// keys and containers give `None`.
pub fn str_at(value: &Value, path: &[&str]) -> Option<String> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render an optional JSON scalar as a table cell; null and missing become empty.
pub fn json_cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
