//! Inline conditions of `USE` declarations.
//!
//! `=`, `==`, `!=` and `<>` use loose equality, `===` and `!==` strict
//! equality; the ordering operators and `BETWEEN` compare numerically.
//!
//! Loose equality coercion:
//!
//! | left \ right | null        | bool        | number              | string              |
//! |--------------|-------------|-------------|---------------------|---------------------|
//! | null         | true        | !truthy     | == 0                | == ""               |
//! | bool         | !truthy     | ==          | truthy ==           | truthy ==           |
//! | number       | == 0        | truthy ==   | numeric             | numeric if numeric, else text |
//! | string       | == ""       | truthy ==   | numeric if numeric, else text | numeric if both numeric, else text |

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    error::ResolutionError,
    formatter::numeric::{Number, to_number},
    json,
    value::{DATETIME_FORMAT, Value, format_float, is_numeric, parse_numeric},
};

static BETWEEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^BETWEEN\s+(.+?)\s+AND\s+(.+)$").expect("between pattern"));
static COMPARISON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([><=!]+)\s*(.+)$").expect("comparison pattern"));

/// Checks a resolved value against a condition such as `> 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    pub fn new() -> Self {
        ConditionEvaluator
    }

    /// `Err(ConditionNotMet)` when `value` fails `condition`. Conditions in an
    /// unknown format pass.
    pub fn evaluate(
        &self,
        variable: &str,
        value: &Value,
        condition: &str,
        expression: &str,
    ) -> Result<(), ResolutionError> {
        let condition = condition.trim();

        let (holds, text) = if let Some(caps) = BETWEEN.captures(condition) {
            let (min, max) = (&caps[1], &caps[2]);
            let n = to_number(value);
            let holds = compare(n, operand_number(min)) != Ordering::Less
                && compare(n, operand_number(max)) != Ordering::Greater;
            (holds, format!("BETWEEN {} AND {}", min, max))
        } else if let Some(caps) = COMPARISON.captures(condition) {
            let (operator, operand) = (&caps[1], &caps[2]);
            let holds = compare_with(value, operator, &parse_operand(operand.trim()));
            (holds, format!("{} {}", operator, operand))
        } else {
            return Ok(());
        };

        if holds {
            Ok(())
        } else {
            Err(ResolutionError::ConditionNotMet {
                variable: variable.to_string(),
                value: json::encode(value),
                condition: text,
                expression: expression.to_string(),
            })
        }
    }

    /// Whether `value` satisfies `condition`.
    pub fn check(&self, value: &Value, condition: &str) -> bool {
        self.evaluate("check", value, condition, "").is_ok()
    }
}

fn compare_with(value: &Value, operator: &str, operand: &Value) -> bool {
    let ordering = || compare(to_number(value), to_number(operand));
    match operator {
        "=" | "==" => loose_eq(value, operand),
        "===" => value == operand,
        "!=" | "<>" => !loose_eq(value, operand),
        "!==" => value != operand,
        "<" => ordering() == Ordering::Less,
        "<=" => ordering() != Ordering::Greater,
        ">" => ordering() == Ordering::Greater,
        ">=" => ordering() != Ordering::Less,
        _ => true,
    }
}

/// Quoted text, `true`/`false`/`null`, a number, or bare text.
fn parse_operand(operand: &str) -> Value {
    let quoted = operand.len() >= 2
        && ((operand.starts_with('"') && operand.ends_with('"'))
            || (operand.starts_with('\'') && operand.ends_with('\'')));
    if quoted {
        return Value::String(operand[1..operand.len() - 1].to_string());
    }

    match operand.to_ascii_lowercase().as_str() {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        "null" => Value::Null,
        _ => parse_numeric(operand).unwrap_or_else(|| Value::String(operand.to_string())),
    }
}

fn operand_number(operand: &str) -> Number {
    to_number(&Value::String(operand.trim().to_string()))
}

/// NaN compares as equal so it never fails an ordering check by itself.
fn compare(a: Number, b: Number) -> Ordering {
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => a.cmp(&b),
        (a, b) => a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Boolean(b) => *b,
        Value::Integer(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::DateTime(_) | Value::Opaque(_) => true,
    }
}

fn number_text(value: &Value) -> Option<String> {
    match value {
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(format_float(*f)),
        _ => None,
    }
}

/// Equality after the coercions in the module table.
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Null, Null) => true,
        (Boolean(_), _) | (_, Boolean(_)) => truthy(a) == truthy(b),
        (Null, String(s)) | (String(s), Null) => s.is_empty(),
        (Null, other) | (other, Null) => !truthy(other),
        (Integer(_) | Float(_), Integer(_) | Float(_)) => {
            compare(to_number(a), to_number(b)) == Ordering::Equal
        }
        (Integer(_) | Float(_), String(s)) | (String(s), Integer(_) | Float(_)) => {
            let number = if matches!(a, String(_)) { b } else { a };
            if is_numeric(s) {
                compare(to_number(number), to_number(&String(s.clone()))) == Ordering::Equal
            } else {
                number_text(number).is_some_and(|text| &text == s)
            }
        }
        (String(x), String(y)) => {
            if is_numeric(x) && is_numeric(y) {
                compare(to_number(a), to_number(b)) == Ordering::Equal
            } else {
                x == y
            }
        }
        (DateTime(x), String(s)) | (String(s), DateTime(x)) => {
            x.format(DATETIME_FORMAT).to_string() == *s
        }
        (Array(x), Array(y)) => x.len() == y.len() && x.iter().zip(y).all(|(p, q)| loose_eq(p, q)),
        (Object(x), Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| loose_eq(v, other)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_equality_matrix() {
        assert!(loose_eq(&Value::Integer(100), &Value::from("100")));
        assert!(loose_eq(&Value::Float(1.0), &Value::Integer(1)));
        assert!(loose_eq(&Value::Null, &Value::Boolean(false)));
        assert!(loose_eq(&Value::Null, &Value::from("")));
        assert!(loose_eq(&Value::from("1e1"), &Value::from("10")));
        assert!(!loose_eq(&Value::Integer(0), &Value::from("abc")));
        assert!(!loose_eq(&Value::Null, &Value::from("0")));
        assert!(loose_eq(&Value::Boolean(true), &Value::from("yes")));
    }

    #[test]
    fn operands() {
        assert_eq!(parse_operand("'a b'"), Value::from("a b"));
        assert_eq!(parse_operand("NULL"), Value::Null);
        assert_eq!(parse_operand("2.5"), Value::Float(2.5));
        assert_eq!(parse_operand("active"), Value::from("active"));
    }
}
