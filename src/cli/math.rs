//! Evaluate an arithmetic expression

use super::CliError;
use crate::{MathEvaluator, Value};

pub fn execute_math(expression: &str) -> Result<Value, CliError> {
    Ok(MathEvaluator::new().evaluate(expression)?)
}
