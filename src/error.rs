//! Error types.
//!
//! Syntax errors abort parsing and are never recovered. Resolution errors
//! are per-token and are subject to the translator's strict / non-strict
//! policy.

use thiserror::Error;

pub type Result<T, E = MustacheError> = std::result::Result<T, E>;

/// Top-level error for every public operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MustacheError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    UseSyntax(#[from] UseSyntaxError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MustacheError {
    pub fn is_syntax(&self) -> bool {
        matches!(self, MustacheError::Syntax(_) | MustacheError::UseSyntax(_))
    }

    pub fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            MustacheError::Resolution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SecurityError> for MustacheError {
    fn from(e: SecurityError) -> Self {
        MustacheError::Resolution(ResolutionError::Security(e))
    }
}

impl From<MathError> for MustacheError {
    fn from(e: MathError) -> Self {
        MustacheError::Resolution(ResolutionError::Math(e))
    }
}

impl From<FormatterError> for MustacheError {
    fn from(e: FormatterError) -> Self {
        MustacheError::Resolution(ResolutionError::Formatter(e))
    }
}

/// Malformed placeholder or temporal syntax.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Unclosed mustache starting at position {position}")]
    UnclosedMustache { template: String, position: usize },

    #[error("Empty mustache at position {position}")]
    EmptyMustache { template: String, position: usize },

    #[error("Nested mustache braces at position {position}")]
    NestedMustache { template: String, position: usize },

    #[error("Unexpected character at position {position}: \"{found}\"")]
    UnexpectedCharacter {
        expression: String,
        found: String,
        position: usize,
    },

    #[error("Unexpected token at position {position}: \"{token}\"")]
    UnexpectedToken { token: String, position: usize },

    #[error("Expected condition or grouped expression at position {position}, got: {found}")]
    ExpectedCondition { found: String, position: usize },

    #[error("Missing closing parenthesis")]
    MissingClosingParen,

    #[error("Expression nested too deeply at position {position} (max depth: {max_depth})")]
    NestingTooDeep { position: usize, max_depth: usize },

    #[error("Invalid nth weekday syntax: \"{condition}\". Expected nth:DAY:N or nth:DAY:N,M")]
    InvalidNthFormat { condition: String },

    #[error("Invalid time range format: \"{spec}\". Expected format: HH:MM-HH:MM")]
    InvalidTimeRange { spec: String },

    #[error("Invalid CRON expression: \"{expression}\". {reason}")]
    InvalidCron { expression: String, reason: String },

    #[error("Invalid day of week: \"{day}\". Expected: monday, tuesday, etc.")]
    InvalidDay { day: String },

    #[error("Invalid occurrence: {occurrence}. Expected 1-5 or -1 for last.")]
    InvalidOccurrence { occurrence: i64 },
}

impl SyntaxError {
    /// Offset into the template or expression, when the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            SyntaxError::UnclosedMustache { position, .. }
            | SyntaxError::EmptyMustache { position, .. }
            | SyntaxError::NestedMustache { position, .. }
            | SyntaxError::UnexpectedCharacter { position, .. }
            | SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::ExpectedCondition { position, .. }
            | SyntaxError::NestingTooDeep { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Malformed `USE ... && ...` clause.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid USE clause syntax in template: {}{}", truncate(.template, 100), hint_suffix(.hint))]
pub struct UseSyntaxError {
    pub template: String,
    pub hint: Option<String>,
}

impl UseSyntaxError {
    pub fn new(template: impl Into<String>, hint: impl Into<String>) -> Self {
        UseSyntaxError {
            template: template.into(),
            hint: Some(hint.into()),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max - 3).collect();
    format!("{}...", head)
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref().map(|h| format!(" Hint: {}", h)).unwrap_or_default()
}

/// Failure to turn a single token into a value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("No resolver found for token: {raw} (type: {token_type})")]
    Unresolvable { raw: String, token_type: String },

    #[error("Failed to resolve token '{raw}': {reason}")]
    ForToken { raw: String, reason: String },

    #[error("{0}")]
    Message(String),

    #[error("Condition failed for variable \"{variable}\": value {value} did not satisfy condition \"{condition}\"")]
    ConditionNotMet {
        variable: String,
        /// JSON rendering of the offending value
        value: String,
        condition: String,
        expression: String,
    },

    #[error("Could not resolve variable \"{variable}\" from expression \"{expression}\"{}", reason_suffix(.reason))]
    VariableNotResolved {
        variable: String,
        expression: String,
        reason: Option<String>,
    },

    #[error(transparent)]
    Formatter(#[from] FormatterError),

    #[error(transparent)]
    Security(#[from] SecurityError),

    #[error(transparent)]
    Math(#[from] MathError),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_ref().map(|r| format!(": {}", r)).unwrap_or_default()
}

impl ResolutionError {
    pub fn message(msg: impl Into<String>) -> Self {
        ResolutionError::Message(msg.into())
    }

    pub fn is_condition_not_met(&self) -> bool {
        matches!(self, ResolutionError::ConditionNotMet { .. })
    }
}

/// Access refused by the security policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SecurityError {
    #[error("Model \"{model}\" is not in the allowed models list. Allowed: {}", allowed_list(.allowed))]
    ModelNotAllowed { model: String, allowed: Vec<String> },

    #[error("Access to path '{path}' is restricted")]
    RestrictedPath { path: String },

    #[error("Path '{path}' exceeds maximum depth of {max_depth}")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("Function not registered: {name}")]
    UnregisteredFunction { name: String },
}

fn allowed_list(allowed: &[String]) -> String {
    if allowed.is_empty() {
        "(all)".to_string()
    } else {
        allowed.join(", ")
    }
}

/// Rejected or failed arithmetic expression.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid math expression \"{expression}\": {reason}")]
pub struct MathError {
    pub expression: String,
    pub reason: MathErrorReason,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathErrorReason {
    #[error("Expression exceeds maximum length of {0} characters")]
    TooLong(usize),

    #[error("Expression exceeds maximum nesting depth of {0}")]
    TooDeep(usize),

    #[error("Operator \"{0}\" is not allowed")]
    InvalidOperator(String),

    #[error("Division by zero")]
    DivisionByZero,
}

impl MathError {
    pub fn new(expression: impl Into<String>, reason: MathErrorReason) -> Self {
        MathError {
            expression: expression.into(),
            reason,
        }
    }
}

/// Formatter lookup or application failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Formatter \"{name}\" failed to process value {input}: {reason}")]
pub struct FormatterError {
    pub name: String,
    /// JSON rendering of the input value
    pub input: String,
    pub reason: String,
}

impl FormatterError {
    pub fn not_allowed(name: &str, allowed: &[&str]) -> Self {
        FormatterError {
            name: name.to_string(),
            input: "null".to_string(),
            reason: format!(
                "Formatter is not in the allowed list. Allowed formatters: {}",
                allowed.join(", ")
            ),
        }
    }

    pub fn not_registered(name: &str) -> Self {
        FormatterError {
            name: name.to_string(),
            input: "null".to_string(),
            reason: "Formatter is not registered".to_string(),
        }
    }

    pub fn unsupported_type(name: &str, type_name: &str) -> Self {
        FormatterError {
            name: name.to_string(),
            input: "null".to_string(),
            reason: format!("Formatter does not support values of type \"{}\"", type_name),
        }
    }

    pub fn failed(name: &str, input: String, reason: impl Into<String>) -> Self {
        FormatterError {
            name: name.to_string(),
            input,
            reason: reason.into(),
        }
    }
}

/// Invalid configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Resolver not found: {0}")]
    MissingResolver(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Required configuration key missing: {0}")]
    MissingRequired(String),
}
