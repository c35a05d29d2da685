use indexmap::IndexMap;

use super::parser::LOCAL_VARIABLE;
use crate::{
    json,
    value::{DATETIME_FORMAT, Value, format_float},
};

/// Substitutes `{name}` references with resolved values.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalVariableReplacer;

impl LocalVariableReplacer {
    pub fn new() -> Self {
        LocalVariableReplacer
    }

    /// Replace every declared `{name}`; unknown names are left as written.
    /// Substituted text is not scanned again.
    pub fn replace(&self, statement: &str, variables: &IndexMap<String, Value>) -> String {
        LOCAL_VARIABLE
            .replace_all(statement, |caps: &regex::Captures<'_>| match variables.get(&caps[1]) {
                Some(value) => substitution(value),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    pub fn has_variables(&self, statement: &str) -> bool {
        LOCAL_VARIABLE
            .captures_iter(statement)
            .any(|caps| caps[1].starts_with(|c: char| c.is_alphabetic() || c == '_'))
    }
}

/// Text form of a value inside a statement.
fn substitution(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Boolean(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
        Value::Array(_) | Value::Object(_) | Value::Opaque(_) => json::encode(value),
    }
}
