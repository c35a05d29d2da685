use mustache_resolver::{
    Value,
    cli::{
        CliError, CompoundOptions, CompoundOutcome, TemporalOptions, TranslateOptions,
        execute_compound, execute_math, execute_temporal, execute_translate,
    },
};
use pretty_assertions::assert_eq;

fn translate(template: &str, input: Option<&str>, vars: &[&str], lenient: bool) -> Result<String, String> {
    let options = TranslateOptions {
        template: template.to_string(),
        input: input.map(str::to_string),
        vars: vars.iter().map(|v| v.to_string()).collect(),
        lenient,
    };
    let result = execute_translate(&options).map_err(|e| e.to_string())?;
    result
        .translated()
        .map(str::to_string)
        .ok_or_else(|| result.failure_reason().unwrap_or_default())
}

// ============================================================================
// translate
// ============================================================================

#[test]
fn test_translate_with_input_and_vars() {
    let out = translate(
        "{{User.name}} has {{$n}} items, total {{ 2 * 3 }}",
        Some(r#"{"name": "Ann"}"#),
        &["n=4"],
        false,
    );
    assert_eq!(out, Ok("Ann has 4 items, total 6".to_string()));
}

#[test]
fn test_translate_formatters_are_enabled() {
    let out = translate("{{uppercase(User.name)}}", Some(r#"{"name": "ann"}"#), &[], false);
    assert_eq!(out, Ok("ANN".to_string()));
}

#[test]
fn test_translate_strict_and_lenient() {
    assert_eq!(
        translate("[{{camelCase.x}}]", None, &[], false),
        Err("Missing fields: camelCase.x".to_string())
    );
    assert_eq!(translate("[{{camelCase.x}}]", None, &[], true), Ok("[]".to_string()));
}

#[test]
fn test_translate_rejects_bad_input() {
    let err = translate("{{User.name}}", Some("{not json"), &[], false).unwrap_err();
    assert!(err.starts_with("Invalid JSON"));

    let err = translate("{{User.name}}", None, &["novalue"], false).unwrap_err();
    assert_eq!(err, "Invalid variable 'novalue'. Expected key=value.");

    let err = translate("{{User.name", None, &[], false).unwrap_err();
    assert!(err.starts_with("Error: Unclosed mustache"));
}

// ============================================================================
// temporal / math
// ============================================================================

#[test]
fn test_temporal_at_instant() {
    let holds = |at: &str| {
        execute_temporal(&TemporalOptions {
            expression: "weekday && 08:00-18:00".to_string(),
            at: Some(at.to_string()),
        })
        .unwrap()
    };
    assert!(holds("2025-12-10 10:00:00"));
    assert!(!holds("2025-12-13T10:00:00"));
}

#[test]
fn test_temporal_bad_instant() {
    let err = execute_temporal(&TemporalOptions {
        expression: "always".to_string(),
        at: Some("yesterday".to_string()),
    })
    .unwrap_err();
    assert!(matches!(err, CliError::InvalidTimestamp(_)));
}

#[test]
fn test_math() {
    assert_eq!(execute_math("(1 + 2) * 3").unwrap(), Value::Integer(9));
    assert!(matches!(execute_math("1 / 0"), Err(CliError::Mustache(_))));
}

// ============================================================================
// compound
// ============================================================================

const QUERY: &str = "USE {p} => {{Unit.power}} > 0 && SET power = {p}";

#[test]
fn test_compound_outcomes() {
    let run = |input: &str| {
        execute_compound(&CompoundOptions {
            template: QUERY.to_string(),
            input: Some(input.to_string()),
            validate_only: false,
        })
        .unwrap()
    };

    assert!(matches!(
        run(r#"{"power": 5}"#),
        CompoundOutcome::Statement(ref s) if s == "SET power = 5"
    ));
    assert!(matches!(run(r#"{"power": 0}"#), CompoundOutcome::ConditionNotMet));
}

#[test]
fn test_compound_validate_only() {
    let outcome = execute_compound(&CompoundOptions {
        template: "USE {p} => {{Unit.power}} && {q}".to_string(),
        input: None,
        validate_only: true,
    })
    .unwrap();
    let CompoundOutcome::Validation(report) = outcome else {
        panic!("expected a validation report");
    };
    assert!(!report.valid);
    assert_eq!(report.errors, vec!["Undeclared variables used in statement: {q}"]);
}
