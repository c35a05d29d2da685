//! Evaluate a temporal expression

use chrono::NaiveDateTime;

use super::CliError;
use crate::{ConditionRegistry, Value, formatter::datetime::to_datetime, temporal::Clock};

/// Options for the temporal command
#[derive(Debug, Clone, Default)]
pub struct TemporalOptions {
    pub expression: String,
    /// Evaluation instant; the current local time when absent
    pub at: Option<String>,
}

pub fn execute_temporal(options: &TemporalOptions) -> Result<bool, CliError> {
    let at = match &options.at {
        Some(at) => parse_instant(at)?,
        None => crate::temporal::SystemClock.now(),
    };

    let expression = ConditionRegistry::instance().create_expression(&options.expression);
    Ok(expression.evaluate(&at)?)
}

fn parse_instant(text: &str) -> Result<NaiveDateTime, CliError> {
    to_datetime(&Value::String(text.to_string()))
        .map_err(|_| CliError::InvalidTimestamp(text.to_string()))
}
