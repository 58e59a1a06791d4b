//! Top-level change summaries for audit entries

use serde_json::{Map, Value};

/// Fields that change on every save and carry no information
const IGNORED_FIELDS: &[&str] = &["updated_at"];

const MAX_STRING: usize = 40;

/// Summarize the changed top-level fields between two serialized entities
///
/// Returns `None` when nothing meaningful changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(old), Value::Object(new)) => object_changes(old, new),
        _ if before != after => vec![format!("{} -> {}", summarize(before), summarize(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn object_changes(old: &Map<String, Value>, new: &Map<String, Value>) -> Vec<String> {
    let mut changes = Vec::new();

    for (key, old_value) in old {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match new.get(key) {
            Some(new_value) if new_value == old_value => {}
            Some(new_value) => changes.push(format!(
                "{}: {} -> {}",
                key,
                summarize(old_value),
                summarize(new_value)
            )),
            None => changes.push(format!("{}: {} -> (removed)", key, summarize(old_value))),
        }
    }

    for (key, new_value) in new {
        if !old.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, summarize(new_value)));
        }
    }

    changes
}

fn summarize(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_STRING => {
            let head: String = s.chars().take(MAX_STRING - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
