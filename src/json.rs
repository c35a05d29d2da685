//! JSON <-> Value conversion utilities

use crate::value::{DATETIME_FORMAT, Value};

/// Convert serde_json::Value to Value
pub fn from_json(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(from_json).collect()),
        serde_json::Value::Object(obj) => {
            Value::Object(obj.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

/// Convert Value to serde_json::Value.
///
/// Date-times become `Y-m-d H:i:s` strings; host objects are rendered
/// through their field names.
pub fn to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::DateTime(dt) => serde_json::Value::String(dt.format(DATETIME_FORMAT).to_string()),
        Value::Array(arr) => serde_json::Value::Array(arr.iter().map(to_json).collect()),
        Value::Object(obj) => serde_json::Value::Object(
            obj.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
        Value::Opaque(record) => serde_json::Value::Object(
            record
                .field_names()
                .into_iter()
                .map(|name| {
                    let value = v.lookup(&name);
                    (name, to_json(&value))
                })
                .collect(),
        ),
    }
}

/// Compact JSON text for a value, as embedded in error messages.
pub fn encode(v: &Value) -> String {
    to_json(v).to_string()
}
