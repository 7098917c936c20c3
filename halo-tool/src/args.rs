//! Argument coercion. Models send either a bare string or a JSON object as
//! `Action Input`, and tools accept both.

use serde_json::{Map, Value};

/// The string form of a single-argument tool input. Objects are searched
/// for the first present key in `keys`.
pub fn text_arg(args: &Value, keys: &[&str]) -> String {
    match args {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => keys
            .iter()
            .find_map(|key| map.get(*key))
            .map(scalar_to_string)
            .unwrap_or_default(),
        Value::Null => String::new(),
        other => scalar_to_string(other),
    }
}

/// Object form of a dict-style tool input. A string holding a JSON object is
/// decoded; anything else yields an empty map.
pub fn object_arg(args: &Value) -> Map<String, Value> {
    match args {
        Value::Object(map) => map.clone(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

pub fn field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).map(scalar_to_string).filter(|s| !s.is_empty())
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
