use serde_json::{Map, Value};

/// Headline figures, most telling first.
const PRIORITY_KEYS: [&str; 8] = [
    "cash_flow",
    "portfolio_yield",
    "profitability",
    "tier",
    "valid",
    "total_investment",
    "final_equity",
    "filled_fields",
];

/// Nested sections searched when the result itself has no headline figure.
const SECTIONS: [&str; 4] = ["difference", "metrics", "summary", "preview"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = find_headline(map) {
            println!("{}", format_minimal(val));
            return;
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn find_headline(map: &Map<String, Value>) -> Option<&Value> {
    let direct = PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null());
    if direct.is_some() {
        return direct;
    }

    SECTIONS
        .iter()
        .filter_map(|section| map.get(*section).and_then(Value::as_object))
        .find_map(find_headline)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_minimal).collect::<Vec<_>>().join(","),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
