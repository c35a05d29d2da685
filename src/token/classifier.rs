use tracing::trace;

use super::{Token, TokenType};
use crate::value::{Value, is_numeric, parse_numeric};

const COLLECTION_KEYWORDS: [&str; 2] = ["first", "last"];

/// Characters stripped from quoted defaults and temporal arguments.
const QUOTE_TRIM: &[char] = &[' ', '\t', '\n', '\r', '\0', '\x0B', '\'', '"'];

/// Turns trimmed placeholder content into a [`Token`].
///
/// Checks run in a fixed order and the first match wins: null coalesce,
/// temporal prefix, function call, variable, arithmetic, then path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenClassifier;

impl TokenClassifier {
    pub fn classify(&self, raw: &str) -> Token {
        let raw = raw.trim();

        let token = if raw.contains("??") {
            self.null_coalesce(raw)
        } else if is_temporal(raw) {
            self.temporal(raw)
        } else if is_function(raw) {
            self.function(raw)
        } else if raw.starts_with('$') && !raw.contains('.') {
            Token::new(raw, TokenType::Variable, vec![raw[1..].to_string()])
        } else if is_math(raw) {
            Token::new(raw, TokenType::Math, Vec::new()).with_metadata([("expression", raw)])
        } else {
            self.path_token(raw)
        };

        trace!(raw, token_type = %token.token_type(), "classified placeholder");
        token
    }

    fn null_coalesce(&self, raw: &str) -> Token {
        let (expression, default) = raw.split_once("??").unwrap_or((raw, ""));
        let default = default.trim_matches(QUOTE_TRIM);
        let default = (!default.is_empty()).then(|| default.to_string());

        Token::new(raw, TokenType::NullCoalesce, split_path(expression.trim())).with_default(default)
    }

    fn temporal(&self, raw: &str) -> Token {
        let (temporal_type, rest) = if let Some(rest) = raw.strip_prefix("TEMPORAL:") {
            ("temporal", Some(rest))
        } else if let Some(rest) = raw.strip_prefix("NOW:") {
            ("now", Some(rest))
        } else if raw == "NOW" {
            ("now", None)
        } else if let Some(rest) = raw.strip_prefix("TODAY:") {
            ("today", Some(rest))
        } else if raw == "TODAY" {
            ("today", None)
        } else {
            // `NOWHERE`, `TODAYS.x`: prefix-like but no recognizable form
            ("unknown", None)
        };

        let mut function_name = None;
        let mut args = Vec::new();
        let mut expression = String::new();

        match rest {
            Some(rest) => match split_call(rest) {
                Some((name, inner)) => {
                    function_name = Some(name.to_string());
                    expression = inner.trim_matches(QUOTE_TRIM).to_string();
                    args = parse_args(inner.trim());
                }
                None if temporal_type == "temporal" => expression = rest.to_string(),
                None => function_name = Some(rest.to_string()),
            },
            None if temporal_type != "unknown" => function_name = Some("default".to_string()),
            None => {}
        }

        Token::new(raw, TokenType::Temporal, Vec::new())
            .with_function(function_name, args)
            .with_metadata([("temporal_type", temporal_type), ("expression", expression.as_str())])
    }

    fn function(&self, raw: &str) -> Token {
        match split_call(raw) {
            Some((name, inner)) => {
                let references: Vec<String> = split_args(inner.trim())
                    .iter()
                    .enumerate()
                    .filter(|(_, arg)| is_reference_arg(arg))
                    .map(|(i, _)| i.to_string())
                    .collect();
                Token::new(raw, TokenType::Function, Vec::new())
                    .with_function(Some(name.to_string()), parse_args(inner.trim()))
                    .with_metadata([("reference_args", references.join(","))])
            }
            None => Token::new(raw, TokenType::Unknown, Vec::new()),
        }
    }

    fn path_token(&self, raw: &str) -> Token {
        let path = split_path(raw);
        let Some(prefix) = path.first() else {
            return Token::new(raw, TokenType::Unknown, Vec::new());
        };

        let token_type = if path.iter().any(|s| s.starts_with('$')) {
            TokenType::Dynamic
        } else if path
            .iter()
            .any(|s| is_numeric(s) || s == "*" || COLLECTION_KEYWORDS.contains(&s.as_str()))
        {
            TokenType::Collection
        } else if is_pascal_case(prefix) {
            if path.len() > 2 {
                TokenType::Relation
            } else {
                TokenType::Model
            }
        } else if is_snake_case(prefix) {
            TokenType::Table
        } else {
            TokenType::Unknown
        };

        Token::new(raw, token_type, path)
    }
}

fn is_temporal(raw: &str) -> bool {
    ["TEMPORAL:", "NOW", "TODAY"]
        .iter()
        .any(|prefix| raw.starts_with(prefix))
}

/// Length of the leading `[A-Za-z_][A-Za-z0-9_]*` identifier.
fn identifier_len(s: &str) -> usize {
    let mut len = 0;
    for (i, ch) in s.char_indices() {
        let ok = if i == 0 {
            ch.is_ascii_alphabetic() || ch == '_'
        } else {
            ch.is_ascii_alphanumeric() || ch == '_'
        };
        if !ok {
            break;
        }
        len = i + ch.len_utf8();
    }
    len
}

/// `name (` at the very start.
fn is_function(raw: &str) -> bool {
    let len = identifier_len(raw);
    len > 0 && raw[len..].trim_start().starts_with('(')
}

/// Split `name(inner)` into its parts; the call must close at the end.
fn split_call(s: &str) -> Option<(&str, &str)> {
    let len = identifier_len(s);
    if len == 0 {
        return None;
    }
    let after = s[len..].trim_start();
    let inner = after.strip_prefix('(')?.strip_suffix(')')?;
    Some((&s[..len], inner))
}

/// An operator flanked by a digit or whitespace on both sides.
fn is_math(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let flank = |b: u8| b.is_ascii_digit() || b.is_ascii_whitespace();
    (1..bytes.len().saturating_sub(1)).any(|k| {
        matches!(bytes[k], b'+' | b'-' | b'*' | b'/') && flank(bytes[k - 1]) && flank(bytes[k + 1])
    })
}

fn is_pascal_case(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

fn is_snake_case(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Split on `.` except inside `[...]`, trimming each segment.
pub fn split_path(expression: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for ch in expression.chars() {
        match ch {
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            '.' if depth == 0 => segments.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(ch),
        }
    }
    segments.push(current.trim().to_string());
    segments
}

/// Split an argument list on top-level commas. Commas inside quotes or
/// nested parentheses do not split.
pub fn split_args(args: &str) -> Vec<String> {
    if args.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = args.chars().collect();
    let mut result = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for (i, &ch) in chars.iter().enumerate() {
        if (ch == '"' || ch == '\'') && (i == 0 || chars[i - 1] != '\\') {
            match quote {
                None => quote = Some(ch),
                Some(q) if q == ch => quote = None,
                Some(_) => {}
            }
        }

        if quote.is_none() {
            match ch {
                '(' => depth += 1,
                ')' => depth -= 1,
                _ => {}
            }
        }

        if ch == ',' && depth == 0 && quote.is_none() {
            result.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    if !current.trim().is_empty() {
        result.push(current.trim().to_string());
    }
    result
}

/// [`split_args`] with each argument decoded.
pub fn parse_args(args: &str) -> Vec<Value> {
    split_args(args).iter().map(|arg| decode_arg(arg)).collect()
}

/// Whether an argument is a reference to data rather than a literal.
pub fn is_reference_arg(arg: &str) -> bool {
    !is_quoted(arg)
        && parse_numeric(arg).is_none()
        && !matches!(arg.to_ascii_lowercase().as_str(), "true" | "false" | "null")
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

/// Quoted text becomes a string; numbers, booleans and `null` are decoded;
/// anything else stays a bare reference string.
fn decode_arg(value: &str) -> Value {
    if is_quoted(value) {
        return Value::String(value[1..value.len() - 1].to_string());
    }
    if let Some(number) = parse_numeric(value) {
        return number;
    }
    match value.to_ascii_lowercase().as_str() {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        "null" => Value::Null,
        _ => Value::String(value.to_string()),
    }
}
