use std::sync::Arc;

use mustache_resolver::{Formatter, FormatterError, FormatterRegistry, Value};
use pretty_assertions::assert_eq;

fn apply(name: &str, value: impl Into<Value>, args: &[Value]) -> Value {
    FormatterRegistry::with_defaults()
        .apply(name, &value.into(), args)
        .unwrap()
}

fn apply_err(name: &str, value: impl Into<Value>, args: &[Value]) -> FormatterError {
    FormatterRegistry::with_defaults()
        .apply(name, &value.into(), args)
        .unwrap_err()
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_defaults_cover_allow_list() {
    let registry = FormatterRegistry::with_defaults();
    assert_eq!(registry.len(), registry.allowed_names().len());
    for name in registry.allowed_names() {
        assert!(registry.has(name), "{}", name);
    }
}

#[test]
fn test_unknown_name_is_not_allowed() {
    let err = apply_err("system", "ls", &[]);
    assert!(err.reason.starts_with("Formatter is not in the allowed list"));
}

#[test]
fn test_allowed_but_unregistered() {
    let err = FormatterRegistry::new()
        .apply("uppercase", &Value::from("x"), &[])
        .unwrap_err();
    assert_eq!(err.reason, "Formatter is not registered");
}

#[derive(Debug)]
struct Shout(&'static str);

impl Formatter for Shout {
    fn name(&self) -> &str {
        self.0
    }

    fn format(&self, value: &Value, _args: &[Value]) -> Result<Value, String> {
        Ok(Value::String(format!("{}!", value.to_template_string().to_uppercase())))
    }
}

#[test]
fn test_register_replaces_allowed_formatter() {
    let mut registry = FormatterRegistry::with_defaults();
    registry.register(Arc::new(Shout("uppercase"))).unwrap();
    assert_eq!(
        registry.apply("uppercase", &Value::from("hey"), &[]).unwrap(),
        Value::from("HEY!")
    );

    let err = registry.register(Arc::new(Shout("shout"))).unwrap_err();
    assert_eq!(err.name, "shout");
}

#[test]
fn test_unsupported_input_type() {
    let err = apply_err("uppercase", Value::Array(vec![]), &[]);
    assert_eq!(err.reason, "Formatter does not support values of type \"array\"");
}

// ============================================================================
// Numeric
// ============================================================================

#[test]
fn test_casts() {
    assert_eq!(apply("toInt", "42", &[]), Value::Integer(42));
    assert_eq!(apply("toInt", 3.9, &[]), Value::Integer(3));
    assert_eq!(apply("toInt", true, &[]), Value::Integer(1));
    assert_eq!(apply("toFloat", "2.5", &[]), Value::Float(2.5));
    assert_eq!(apply("toInt", "abc", &[]), Value::Integer(0));
}

#[test]
fn test_cents() {
    assert_eq!(apply("toCents", 12.34, &[]), Value::Integer(1234));
    assert_eq!(apply("toCents", 3i64, &[]), Value::Integer(300));
    assert_eq!(apply("fromCents", 1250i64, &[]), Value::Float(12.5));
    assert_eq!(apply("fromCents", 1200i64, &[]), Value::Integer(12));
}

#[test]
fn test_rounding() {
    assert_eq!(apply("round", 2.5, &[]), Value::Float(3.0));
    assert_eq!(apply("round", 1.2345, &[Value::Integer(2)]), Value::Float(1.23));
    assert_eq!(apply("floor", 2.7, &[]), Value::Integer(2));
    assert_eq!(apply("ceil", 2.1, &[]), Value::Integer(3));
    assert_eq!(apply("abs", -5i64, &[]), Value::Integer(5));
}

#[test]
fn test_number_and_percent() {
    assert_eq!(apply("number", 1234.5, &[]), Value::from("1,234.50"));
    assert_eq!(
        apply(
            "number",
            1234.5,
            &[Value::Integer(1), Value::from(","), Value::from(".")]
        ),
        Value::from("1.234,5")
    );
    assert_eq!(apply("percent", 0.256, &[Value::Integer(1)]), Value::from("25.6%"));
}

// ============================================================================
// String
// ============================================================================

#[test]
fn test_case_and_trim() {
    assert_eq!(apply("uppercase", "ann", &[]), Value::from("ANN"));
    assert_eq!(apply("lowercase", "ANN", &[]), Value::from("ann"));
    assert_eq!(apply("trim", "  x  ", &[]), Value::from("x"));
    assert_eq!(apply("uppercase", 12i64, &[]), Value::from("12"));
}

#[test]
fn test_substr_and_replace() {
    assert_eq!(
        apply("substr", "Hello World", &[Value::Integer(6)]),
        Value::from("World")
    );
    assert_eq!(
        apply("substr", "Hello World", &[Value::Integer(0), Value::Integer(5)]),
        Value::from("Hello")
    );
    assert_eq!(
        apply("replace", "a-b-c", &[Value::from("-"), Value::from("+")]),
        Value::from("a+b+c")
    );
    assert_eq!(apply("replace", "abc", &[]), Value::from("abc"));
}

#[test]
fn test_concat() {
    assert_eq!(apply("concat", "a", &[Value::from("b")]), Value::from("ab"));
    assert_eq!(
        apply("concat", "mid", &[Value::from("<"), Value::from(">")]),
        Value::from("<mid>")
    );
}

#[test]
fn test_slug_and_case_styles() {
    assert_eq!(apply("slug", "Hello World!", &[]), Value::from("hello-world"));
    assert_eq!(apply("slug", "Hello World", &[Value::from("_")]), Value::from("hello_world"));
    assert_eq!(apply("camel", "order_total", &[]), Value::from("orderTotal"));
    assert_eq!(apply("snake", "orderTotal", &[]), Value::from("order_total"));
    assert_eq!(apply("title", "the order", &[]), Value::from("The Order"));
}

// ============================================================================
// Date/time
// ============================================================================

#[test]
fn test_date_parts() {
    let at = "2025-12-10 14:30:00";
    assert_eq!(apply("toDateString", at, &[]), Value::from("2025-12-10"));
    assert_eq!(apply("toTimeString", at, &[]), Value::from("14:30:00"));
    assert_eq!(apply("toDateTime", "2025-12-10", &[]), Value::from("2025-12-10 00:00:00"));
    assert_eq!(
        apply("formatDate", at, &[Value::from("d/m/Y")]),
        Value::from("10/12/2025")
    );
}

#[test]
fn test_unix_time() {
    assert_eq!(apply("toUnixTime", 1700000000i64, &[]), Value::Integer(1700000000));
    assert_eq!(apply("toUnixTime", "1970-01-01 00:01:00", &[]), Value::Integer(60));
    assert_eq!(apply("toDateTime", 86400i64, &[]), Value::from("1970-01-02 00:00:00"));
}

#[test]
fn test_unparseable_date() {
    let err = apply_err("toDateString", "garbage", &[]);
    assert_eq!(err.input, "\"garbage\"");
    assert_eq!(
        err.to_string(),
        "Formatter \"toDateString\" failed to process value \"garbage\": \
         Failed to parse time string (garbage)"
    );
}
