//! Field-level change summaries for audit entries

use serde_json::Value;

/// Fields that change on every write and say nothing about intent
const IGNORED_FIELDS: &[&str] = &["updatedAt", "currentAmount"];

/// Summarize top-level field changes, e.g. `limitAmount: 500.0 -> 750.0`
///
/// Returns `None` when nothing meaningful changed.
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", short(before), short(after)));
    };

    let mut changes = Vec::new();
    for (key, before_val) in before_obj {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match after_obj.get(key) {
            Some(after_val) if after_val != before_val => {
                changes.push(format!("{}: {} -> {}", key, short(before_val), short(after_val)));
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, short(before_val))),
        }
    }
    for (key, after_val) in after_obj {
        if !before_obj.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", key, short(after_val)));
        }
    }

    (!changes.is_empty()).then(|| changes.join(", "))
}

fn short(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 40 => {
            let head: String = s.chars().take(37).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => match obj.get("name") {
            Some(Value::String(name)) => format!("{{name: \"{}\"}}", name),
            _ => format!("{{{} fields}}", obj.len()),
        },
        other => other.to_string(),
    }
}
