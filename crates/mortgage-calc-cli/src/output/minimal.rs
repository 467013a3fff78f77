use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in the result object and one level below it
/// (the payment result nests its numbers under `schedule`), then falls back
/// to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    println!("{}", pick_minimal(result_obj));
}

fn pick_minimal(result_obj: &Value) -> String {
    let priority_keys = ["monthly_payment", "within_bounds", "total_paid"];

    if let Value::Object(map) = result_obj {
        let nested = map.get("schedule").and_then(Value::as_object);
        for key in &priority_keys {
            let hit = map
                .get(*key)
                .or_else(|| nested.and_then(|n| n.get(*key)));
            if let Some(val) = hit {
                if !val.is_null() {
                    return format_minimal(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
