//! CLI support for mustache-resolver
//!
//! Each subcommand of the `mustache` binary is a plain function here so it
//! can be driven without a process.

mod compound;
mod math;
mod temporal;
mod translate;

pub use compound::{CompoundOptions, CompoundOutcome, execute_compound};
pub use math::execute_math;
pub use temporal::{TemporalOptions, execute_temporal};
pub use translate::{TranslateOptions, execute_translate};

use std::io;

use crate::{
    Context, MustacheError, Value,
    error::{ConfigError, MathError, SyntaxError},
    json,
};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Template, expression or resolution error
    Mustache(MustacheError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// `--var` not in `key=value` form
    InvalidVariable(String),
    /// `--at` not a recognizable date-time
    InvalidTimestamp(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Mustache(e) => write!(f, "Error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::InvalidVariable(v) => {
                write!(f, "Invalid variable '{}'. Expected key=value.", v)
            }
            CliError::InvalidTimestamp(t) => write!(
                f,
                "Invalid timestamp '{}'. Expected YYYY-MM-DD HH:MM:SS or RFC 3339.",
                t
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Mustache(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MustacheError> for CliError {
    fn from(e: MustacheError) -> Self {
        CliError::Mustache(e)
    }
}

impl From<SyntaxError> for CliError {
    fn from(e: SyntaxError) -> Self {
        CliError::Mustache(e.into())
    }
}

impl From<MathError> for CliError {
    fn from(e: MathError) -> Self {
        CliError::Mustache(e.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Mustache(e.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Context over the JSON document in `input`, or over an empty object.
fn input_context(input: Option<&str>) -> Result<Context, CliError> {
    match input {
        Some(text) => {
            let data: serde_json::Value = serde_json::from_str(text).map_err(CliError::Json)?;
            Ok(Context::from_json(data))
        }
        None => Ok(Context::default()),
    }
}

/// `key=value`; the value is decoded as JSON when it parses, else kept as text.
fn parse_variable(spec: &str) -> Result<(String, Value), CliError> {
    let (key, raw) = spec
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| CliError::InvalidVariable(spec.to_string()))?;
    let value = serde_json::from_str(raw)
        .map(json::from_json)
        .unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variables_decode_json_values() {
        assert_eq!(parse_variable("n=3").unwrap(), ("n".to_string(), Value::Integer(3)));
        assert_eq!(
            parse_variable("name=Ann").unwrap(),
            ("name".to_string(), Value::from("Ann"))
        );
        assert!(parse_variable("=x").is_err());
        assert!(parse_variable("novalue").is_err());
    }
}
