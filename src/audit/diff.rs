//! Field-level change summaries for audit entries

use serde_json::Value;

/// Summarize which top-level fields changed between two JSON records
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let mut changes: Vec<String> = old
                .iter()
                .filter_map(|(key, old_val)| match new.get(key) {
                    Some(new_val) if new_val == old_val => None,
                    Some(new_val) => Some(format!(
                        "{}: {} -> {}",
                        key,
                        format_value(old_val),
                        format_value(new_val)
                    )),
                    None => Some(format!("{}: {} -> (removed)", key, format_value(old_val))),
                })
                .collect();

            changes.extend(
                new.iter()
                    .filter(|(key, _)| !old.contains_key(*key))
                    .map(|(key, val)| format!("{}: (added) -> {}", key, format_value(val))),
            );
            changes
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_changed_field_only() {
        let before = json!({"status": "pending", "value": 250.0});
        let after = json!({"status": "completed", "value": 250.0});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "status: \"pending\" -> \"completed\"");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"observation": "urgente"});
        let after = json!({"complement": "Sala 2"});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("observation: \"urgente\" -> (removed)"));
        assert!(diff.contains("complement: (added) -> \"Sala 2\""));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"name": "Ana"});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_long_strings_truncated_on_char_boundary() {
        let before = json!({"description": "ç".repeat(60)});
        let after = json!({"description": ""});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("...\""));
    }
}
