use serde_json::{Map, Value};
use std::io;

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Sections that are naturally one row per entry (projection years).
const ROW_SECTIONS: [&str; 1] = ["years"];

/// Write output as CSV to stdout.
///
/// Tabular results (arrays, projection years) become one row per entry;
/// anything else becomes `field,value` pairs with dotted paths for nested
/// fields.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => match row_section(map) {
            Some(rows) => write_rows(&mut wtr, rows),
            None => {
                let _ = wtr.write_record(["field", "value"]);
                write_pairs(&mut wtr, "", map);
            }
        },
        other => {
            let _ = wtr.write_record([&format_csv_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn row_section(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    ROW_SECTIONS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
}

fn write_pairs(wtr: &mut StdoutWriter<'_>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => write_pairs(wtr, &path, inner),
            Value::Array(arr) if arr.iter().any(Value::is_object) => {
                for (i, item) in arr.iter().enumerate() {
                    if let Value::Object(inner) = item {
                        write_pairs(wtr, &format!("{path}.{i}"), inner);
                    }
                }
            }
            _ => {
                let _ = wtr.write_record([path.as_str(), &format_csv_value(val)]);
            }
        }
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_csv_value).collect::<Vec<_>>().join(";"),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
