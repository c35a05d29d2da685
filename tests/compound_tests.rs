use std::sync::Arc;

use indexmap::IndexMap;
use mustache_resolver::{
    CompoundResolver, Context, MustacheError, PipelineBuilder, ResolutionError, Value,
    compound::{CompoundParser, ConditionEvaluator, LocalVariableReplacer},
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn compound() -> CompoundResolver {
    CompoundResolver::new(Arc::new(PipelineBuilder::new().build()))
}

fn context(max_power: serde_json::Value) -> Context {
    Context::from_json(json!({
        "max_power": max_power,
        "name": "Alpha",
        "status": "active",
        "nickname": null
    }))
}

const QUERY: &str =
    "USE {max_power} => {{CommandCenter.max_power}} > 0 && SELECT * WHERE power < {max_power}";

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_condition_met_fills_statement() {
    let statement = compound().resolve(QUERY, &context(json!(100))).unwrap();
    assert_eq!(statement, "SELECT * WHERE power < 100");
}

#[test]
fn test_condition_not_met() {
    let err = compound().resolve(QUERY, &context(json!(0))).unwrap_err();
    assert_eq!(
        err,
        MustacheError::Resolution(ResolutionError::ConditionNotMet {
            variable: "max_power".to_string(),
            value: "0".to_string(),
            condition: "> 0".to_string(),
            expression: "{{CommandCenter.max_power}}".to_string(),
        })
    );
    assert_eq!(
        err.to_string(),
        "Condition failed for variable \"max_power\": value 0 did not satisfy condition \"> 0\""
    );
}

#[test]
fn test_try_resolve_swallows_only_condition_failures() {
    let resolver = compound();
    assert_eq!(resolver.try_resolve(QUERY, &context(json!(0))).unwrap(), None);
    assert_eq!(
        resolver.try_resolve(QUERY, &context(json!(5))).unwrap(),
        Some("SELECT * WHERE power < 5".to_string())
    );
    assert!(resolver.try_resolve("USE nothing", &context(json!(5))).is_err());
}

#[test]
fn test_multiple_declarations() {
    let template = "USE {n} => {{Unit.name}}, {p} => {{Unit.max_power}} BETWEEN 1 AND 200 \
                    && UPDATE units SET power = {p} WHERE name = '{n}' AND backup = '{n}'";
    let resolution = compound()
        .resolve_detailed(template, &context(json!(150)))
        .unwrap();
    assert_eq!(
        resolution.statement,
        "UPDATE units SET power = 150 WHERE name = 'Alpha' AND backup = 'Alpha'"
    );
    assert_eq!(resolution.variables.get("p"), Some(&Value::Integer(150)));
    assert_eq!(resolution.original, template);

    let serialized = serde_json::to_value(&resolution).unwrap();
    assert_eq!(serialized["variables"], json!({"n": "Alpha", "p": 150}));
}

#[test]
fn test_between_bounds_are_inclusive() {
    let template = "USE {p} => {{Unit.max_power}} BETWEEN 1 AND 200 && {p}";
    assert_eq!(compound().resolve(template, &context(json!(200))).unwrap(), "200");
    assert_eq!(compound().resolve(template, &context(json!(1))).unwrap(), "1");

    let err = compound().resolve(template, &context(json!(201))).unwrap_err();
    assert!(err.to_string().contains("BETWEEN 1 AND 200"));
}

#[test]
fn test_null_value_is_not_resolved() {
    let template = "USE {nick} => {{Unit.nickname}} && hi {nick}";
    let err = compound().resolve(template, &context(json!(1))).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Could not resolve variable \"nick\" from expression \"{{Unit.nickname}}\": \
         Mustache expression resolved to null"
    );
}

#[test]
fn test_unhandled_expression_is_not_resolved() {
    let template = "USE {x} => {{camelCase.field}} && {x}";
    let err = compound().resolve(template, &context(json!(1))).unwrap_err();
    assert!(matches!(
        err,
        MustacheError::Resolution(ResolutionError::VariableNotResolved { .. })
    ));
    assert!(err.to_string().contains("No resolver could handle the expression"));
}

#[test]
fn test_is_compound() {
    assert!(compound().is_compound("  USE {a} => {{X.a}} && {a}"));
    assert!(!compound().is_compound("USED {a}"));
    assert!(!compound().is_compound("Hello {{User.name}}"));
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_declarations() {
    let expression = CompoundParser::new()
        .parse("USE {a} => {{X.a}} >= 10, {b} => {{X.b}} && {a} {b}")
        .unwrap();
    assert_eq!(expression.variable_names(), vec!["a", "b"]);
    assert_eq!(expression.statement(), "{a} {b}");
    assert!(expression.has_conditions());

    let a = expression.variable("a").unwrap();
    assert_eq!(a.expression(), "{{X.a}}");
    assert_eq!(a.condition(), Some(">= 10"));
    assert_eq!(a.reference(), "{a}");
    assert!(!expression.variable("b").unwrap().has_condition());
}

#[test]
fn test_parse_error_hints() {
    let parser = CompoundParser::new();
    let hint = |template: &str| parser.parse(template).unwrap_err().hint.unwrap_or_default();

    assert_eq!(hint("SELECT 1"), "Template must start with \"USE \"");
    assert_eq!(
        hint("USE {a} => {{X.a}}"),
        "Missing \"&&\" separator between USE clause and statement"
    );
    assert_eq!(hint("USE {a} => {{X.a}} &&   "), "Statement after \"&&\" cannot be empty");
    assert_eq!(
        hint("USE a = X.a && {a}"),
        "Invalid variable declaration format. Expected: {varname} => {{expression}}"
    );
    assert_eq!(
        hint("USE {a} => {{X.a}}, {a} => {{X.b}} && {a}"),
        "Duplicate variable name: {a}"
    );
}

#[test]
fn test_syntax_error_message_truncates_template() {
    let template = format!("USE {}", "x".repeat(200));
    let err = CompoundParser::new().parse(&template).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Invalid USE clause syntax in template: USE xxx"));
    assert!(message.contains("... Hint: Missing \"&&\""));
}

#[test]
fn test_extract_local_variables() {
    let parser = CompoundParser::new();
    assert_eq!(
        parser.extract_local_variables("{b} and {a} then {b}"),
        vec!["b", "a"]
    );
    assert_eq!(
        parser.find_undeclared(&["a"], &["b".to_string(), "a".to_string()]),
        vec!["b"]
    );
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_validate() {
    let report = compound().validate("USE {a} => {{X.a}} && {a} {b} {c}");
    assert!(!report.valid);
    assert_eq!(
        report.errors,
        vec!["Undeclared variables used in statement: {b}, {c}"]
    );

    assert!(compound().validate("USE {a} => {{X.a}} && {a}").valid);

    let broken = compound().validate("USE {a} => {{X.a}}");
    assert!(!broken.valid);
    assert!(broken.errors[0].contains("Missing \"&&\""));
}

// ============================================================================
// Conditions
// ============================================================================

#[test]
fn test_loose_and_strict_equality() {
    let conditions = ConditionEvaluator::new();
    let hundred = Value::Integer(100);

    assert!(conditions.check(&hundred, "= '100'"));
    assert!(conditions.check(&hundred, "== 100.0"));
    assert!(!conditions.check(&hundred, "=== '100'"));
    assert!(conditions.check(&hundred, "=== 100"));
    assert!(conditions.check(&hundred, "!== '100'"));
    assert!(conditions.check(&hundred, "<> 99"));
    assert!(!conditions.check(&hundred, "!= '1e2'"));
}

#[test]
fn test_ordering_is_numeric() {
    let conditions = ConditionEvaluator::new();
    assert!(conditions.check(&Value::from("10"), "> 9"));
    assert!(conditions.check(&Value::Float(2.5), "<= 2.5"));
    assert!(conditions.check(&Value::Boolean(true), ">= 1"));
    assert!(!conditions.check(&Value::from("abc"), "> 0"));
}

#[test]
fn test_text_and_keyword_operands() {
    let conditions = ConditionEvaluator::new();
    assert!(conditions.check(&Value::from("active"), "= active"));
    assert!(conditions.check(&Value::from("active"), "== \"active\""));
    assert!(conditions.check(&Value::Null, "= null"));
    assert!(conditions.check(&Value::Boolean(false), "== false"));
}

#[test]
fn test_unknown_condition_passes() {
    let conditions = ConditionEvaluator::new();
    assert!(conditions.check(&Value::Integer(0), "LIKE 'x%'"));
    assert!(conditions.check(&Value::Integer(0), ""));
}

// ============================================================================
// Replacement
// ============================================================================

#[test]
fn test_replacer_renders_each_kind() {
    let mut values = IndexMap::new();
    values.insert("s".to_string(), Value::from("text"));
    values.insert("i".to_string(), Value::Integer(7));
    values.insert("f".to_string(), Value::Float(1.5));
    values.insert("b".to_string(), Value::Boolean(false));
    values.insert("n".to_string(), Value::Null);
    values.insert(
        "l".to_string(),
        Value::Array(vec![Value::Integer(1), Value::from("x")]),
    );

    let replacer = LocalVariableReplacer::new();
    assert_eq!(
        replacer.replace("{s}|{i}|{f}|{b}|{n}|{l}|{other}", &values),
        "text|7|1.5|false|null|[1,\"x\"]|{other}"
    );
    assert!(replacer.has_variables("a {b} c"));
    assert!(!replacer.has_variables("a {1} c"));
}

#[test]
fn test_replacement_is_single_pass() {
    let mut values = IndexMap::new();
    values.insert("a".to_string(), Value::from("{b}"));
    values.insert("b".to_string(), Value::from("B"));

    let out = LocalVariableReplacer::new().replace("{a} {b}", &values);
    assert_eq!(out, "{b} B");
}
