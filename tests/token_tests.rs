use mustache_resolver::{
    MustacheParser, SyntaxError, Token, TokenType, Value,
    token::classifier::{split_args, split_path},
};
use pretty_assertions::assert_eq;

fn classify(raw: &str) -> Token {
    Token::parse(raw)
}

// ============================================================================
// Path classification
// ============================================================================

#[test]
fn test_pascal_prefix_two_segments_is_model() {
    let token = classify("User.name");
    assert_eq!(token.token_type(), TokenType::Model);
    assert_eq!(token.prefix(), "User");
    assert_eq!(token.field_path(), ["name".to_string()]);
}

#[test]
fn test_pascal_prefix_three_segments_is_relation() {
    let token = classify("User.address.city");
    assert_eq!(token.token_type(), TokenType::Relation);
    assert_eq!(token.field_path(), ["address".to_string(), "city".to_string()]);
}

#[test]
fn test_snake_prefix_is_table_regardless_of_length() {
    assert_eq!(classify("settings.theme").token_type(), TokenType::Table);
    assert_eq!(classify("app_settings.theme.color.dark").token_type(), TokenType::Table);
}

#[test]
fn test_dollar_segment_is_dynamic() {
    let token = classify("User.$field_name");
    assert_eq!(token.token_type(), TokenType::Dynamic);
    assert!(token.is_dynamic());
}

#[test]
fn test_collection_markers() {
    assert_eq!(classify("users.0.email").token_type(), TokenType::Collection);
    assert_eq!(classify("Order.items.first.name").token_type(), TokenType::Collection);
    assert_eq!(classify("Order.items.last").token_type(), TokenType::Collection);
    assert_eq!(classify("Order.items.*.sku").token_type(), TokenType::Collection);
}

#[test]
fn test_unrecognized_prefix_is_unknown() {
    assert_eq!(classify("camelCase.field").token_type(), TokenType::Unknown);
    assert_eq!(classify("9lives").token_type(), TokenType::Unknown);
}

#[test]
fn test_brackets_protect_dots() {
    assert_eq!(
        split_path("data.items[a.b].name"),
        vec!["data", "items[a.b]", "name"]
    );
}

// ============================================================================
// Ordered checks
// ============================================================================

#[test]
fn test_null_coalesce_wins_over_everything() {
    let token = classify("User.nickname ?? 'Anonymous'");
    assert_eq!(token.token_type(), TokenType::NullCoalesce);
    assert_eq!(token.default_value(), Some("Anonymous"));
    assert_eq!(token.path(), ["User".to_string(), "nickname".to_string()]);
}

#[test]
fn test_null_coalesce_empty_default_is_absent() {
    let token = classify("User.nickname ?? ''");
    assert_eq!(token.default_value(), None);
}

#[test]
fn test_temporal_prefixes() {
    let token = classify("NOW:format('Y-m-d')");
    assert_eq!(token.token_type(), TokenType::Temporal);
    assert_eq!(token.meta("temporal_type"), Some("now"));
    assert_eq!(token.function_name(), Some("format"));
    assert_eq!(token.function_args(), [Value::from("Y-m-d")]);

    let bare = classify("TODAY");
    assert_eq!(bare.meta("temporal_type"), Some("today"));
    assert_eq!(bare.function_name(), Some("default"));

    let plain = classify("NOW:timestamp");
    assert_eq!(plain.function_name(), Some("timestamp"));
}

#[test]
fn test_temporal_expression_keeps_argument_text() {
    let token = classify("TEMPORAL:isDue('weekday && 08:00-18:00')");
    assert_eq!(token.meta("temporal_type"), Some("temporal"));
    assert_eq!(token.function_name(), Some("isDue"));
    assert_eq!(token.meta("expression"), Some("weekday && 08:00-18:00"));
}

#[test]
fn test_function_arguments_are_decoded() {
    let token = classify("round(Order.total, 2)");
    assert_eq!(token.token_type(), TokenType::Function);
    assert_eq!(token.function_name(), Some("round"));
    assert_eq!(
        token.function_args(),
        [Value::from("Order.total"), Value::Integer(2)]
    );
    assert_eq!(token.meta("reference_args"), Some("0"));
}

#[test]
fn test_function_literals_are_not_references() {
    let token = classify("concat('a', true, null, 1.5)");
    assert_eq!(
        token.function_args(),
        [
            Value::from("a"),
            Value::Boolean(true),
            Value::Null,
            Value::Float(1.5)
        ]
    );
    assert_eq!(token.meta("reference_args"), Some(""));
}

#[test]
fn test_argument_scanner_respects_quotes_and_parens() {
    assert_eq!(
        split_args("'a, b', inner(1, 2), \"c\""),
        vec!["'a, b'", "inner(1, 2)", "\"c\""]
    );
    assert!(split_args("").is_empty());
}

#[test]
fn test_variable() {
    let token = classify("$count");
    assert_eq!(token.token_type(), TokenType::Variable);
    assert_eq!(token.path(), ["count".to_string()]);

    // a dot makes it a path instead
    assert_ne!(classify("$user.name").token_type(), TokenType::Variable);
}

#[test]
fn test_math_heuristic() {
    assert_eq!(classify("2 + 3").token_type(), TokenType::Math);
    assert_eq!(classify("10/4").token_type(), TokenType::Math);
    assert_eq!(classify("2 + 3").meta("expression"), Some("2 + 3"));
    // hyphenated names are not arithmetic
    assert_ne!(classify("user-name").token_type(), TokenType::Math);
}

#[test]
fn test_capability_flags() {
    for token_type in TokenType::ALL {
        let path_based = matches!(
            token_type,
            TokenType::Model
                | TokenType::Table
                | TokenType::Relation
                | TokenType::Dynamic
                | TokenType::Collection
        );
        assert_eq!(token_type.requires_accessor(), path_based, "{}", token_type);
        assert_eq!(token_type.supports_nesting(), path_based, "{}", token_type);
    }
}

// ============================================================================
// Template parsing
// ============================================================================

#[test]
fn test_parse_extracts_in_order() {
    let parser = MustacheParser::new();
    let tokens = parser
        .parse("{{User.name}} ordered {{ Order.items.0.sku }} on {{NOW}}")
        .unwrap();
    assert_eq!(tokens.raw_strings(), vec!["User.name", "Order.items.0.sku", "NOW"]);
    assert_eq!(tokens.unique_prefixes(), vec!["User", "Order"]);
    assert_eq!(tokens.requiring_accessor().len(), 2);
    assert_eq!(tokens.of_type(TokenType::Temporal).len(), 1);
    assert_eq!(tokens.full_strings()[0], "{{User.name}}");
}

#[test]
fn test_raw_never_contains_braces() {
    let tokens = MustacheParser::new().parse("a {{ x.y }} b").unwrap();
    for token in &tokens {
        assert!(!token.raw().contains("{{"));
        assert!(!token.raw().contains("}}"));
    }
}

#[test]
fn test_unclosed_placeholder_is_syntax_error() {
    let err = MustacheParser::new().parse("Hello {{User.name!").unwrap_err();
    assert!(matches!(err, SyntaxError::UnclosedMustache { position: 6, .. }));
}

#[test]
fn test_empty_placeholder_is_syntax_error() {
    let err = MustacheParser::new().parse("a {{  }} b").unwrap_err();
    assert!(matches!(err, SyntaxError::EmptyMustache { position: 2, .. }));
}

#[test]
fn test_nested_placeholder_is_syntax_error() {
    let err = MustacheParser::new().parse("{{a {{b}} c}}").unwrap_err();
    assert!(matches!(err, SyntaxError::NestedMustache { position: 0, .. }));
}

#[test]
fn test_has_mustaches() {
    let parser = MustacheParser::new();
    assert!(parser.has_mustaches("x {{y}}"));
    assert!(!parser.has_mustaches("plain {text}"));
    assert_eq!(parser.extract_raw("{{a}}-{{b.c}}"), vec!["{{a}}", "{{b.c}}"]);
}

#[test]
fn test_substitute_matches_padded_placeholders() {
    let out = MustacheParser::new().substitute("[{{ a }}|{{b}}|{{c}}]", |content| match content {
        "a" => Some("1".to_string()),
        "b" => Some("2".to_string()),
        _ => None,
    });
    assert_eq!(out, "[1|2|{{c}}]");
}
