//! Resolve or validate a `USE ... && ...` template

use std::sync::Arc;

use super::{CliError, input_context};
use crate::{PipelineBuilder, ValidationReport, compound::CompoundResolver};

/// Options for the compound command
#[derive(Debug, Clone, Default)]
pub struct CompoundOptions {
    pub template: String,
    /// JSON input string
    pub input: Option<String>,
    /// Only check syntax and declarations
    pub validate_only: bool,
}

#[derive(Debug)]
pub enum CompoundOutcome {
    /// The statement with local variables substituted
    Statement(String),
    /// A declaration's condition did not hold
    ConditionNotMet,
    Validation(ValidationReport),
}

pub fn execute_compound(options: &CompoundOptions) -> Result<CompoundOutcome, CliError> {
    let resolver = CompoundResolver::new(Arc::new(PipelineBuilder::new().build()));

    if options.validate_only {
        return Ok(CompoundOutcome::Validation(resolver.validate(&options.template)));
    }

    let context = input_context(options.input.as_deref())?;
    Ok(match resolver.try_resolve(&options.template, &context)? {
        Some(statement) => CompoundOutcome::Statement(statement),
        None => CompoundOutcome::ConditionNotMet,
    })
}
