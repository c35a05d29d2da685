use mustache_resolver::{
    MathEvaluator, Value,
    error::{MathError, MathErrorReason},
};
use pretty_assertions::assert_eq;

fn eval(expression: &str) -> Value {
    MathEvaluator::new().evaluate(expression).unwrap()
}

fn reason(expression: &str) -> MathErrorReason {
    let MathError { reason, .. } = MathEvaluator::new().evaluate(expression).unwrap_err();
    reason
}

// ============================================================================
// Arithmetic
// ============================================================================

#[test]
fn test_precedence() {
    assert_eq!(eval("2 + 3 * 4"), Value::Integer(14));
    assert_eq!(eval("(2 + 3) * 4"), Value::Integer(20));
    assert_eq!(eval("10 - 4 - 3"), Value::Integer(3));
}

#[test]
fn test_division_keeps_integers_when_exact() {
    assert_eq!(eval("6 / 2"), Value::Integer(3));
    assert_eq!(eval("5 / 2"), Value::Float(2.5));
}

#[test]
fn test_float_operand_promotes() {
    assert_eq!(eval("1.5 + 1"), Value::Float(2.5));
    assert_eq!(eval("0.5 * 4"), Value::Float(2.0));
}

#[test]
fn test_unary_signs() {
    assert_eq!(eval("-3 + 5"), Value::Integer(2));
    assert_eq!(eval("-(2 * 3)"), Value::Integer(-6));
    assert_eq!(eval("+4"), Value::Integer(4));
}

#[test]
fn test_empty_expression_is_zero() {
    assert_eq!(eval(""), Value::Integer(0));
    assert_eq!(eval("   "), Value::Integer(0));
}

#[test]
fn test_has_expression() {
    let math = MathEvaluator::new();
    assert!(math.has_expression("1+1"));
    assert!(math.has_expression("(x)"));
    assert!(!math.has_expression("plain"));
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_division_by_zero() {
    assert_eq!(reason("10 / 0"), MathErrorReason::DivisionByZero);
    assert_eq!(reason("1 / (2 - 2)"), MathErrorReason::DivisionByZero);
}

#[test]
fn test_rejects_foreign_characters() {
    assert_eq!(
        reason("2 ** x"),
        MathErrorReason::InvalidOperator("x".to_string())
    );
    assert!(matches!(reason("system(1)"), MathErrorReason::InvalidOperator(_)));
}

#[test]
fn test_length_limit() {
    let long = vec!["1"; 251].join("+");
    assert!(long.len() > 500);
    assert_eq!(reason(&long), MathErrorReason::TooLong(500));

    let fits = vec!["1"; 250].join("+");
    assert_eq!(eval(&fits), Value::Integer(250));
}

#[test]
fn test_depth_limit() {
    let deep = format!("{}1{}", "(".repeat(11), ")".repeat(11));
    assert_eq!(reason(&deep), MathErrorReason::TooDeep(10));

    let allowed = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert_eq!(eval(&allowed), Value::Integer(1));
}

#[test]
fn test_malformed_expressions() {
    assert!(matches!(reason("(1 + 2"), MathErrorReason::InvalidOperator(_)));
    assert!(matches!(reason("1 +"), MathErrorReason::InvalidOperator(_)));
    assert!(matches!(reason("1 2"), MathErrorReason::InvalidOperator(_)));
}

#[test]
fn test_error_message() {
    let err = MathEvaluator::new().evaluate("1 / 0").unwrap_err();
    assert_eq!(err.to_string(), "Invalid math expression \"1 / 0\": Division by zero");
}
