use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::{
    CompoundExpression, CompoundParser, ConditionEvaluator, LocalVariableReplacer, UseVariable,
};
use crate::{
    context::Context,
    error::{MustacheError, ResolutionError, Result},
    parser::MustacheParser,
    resolver::ResolutionPipeline,
    value::Value,
};

/// Resolves the `{{expr}}` of a declaration and checks its condition.
#[derive(Debug, Clone)]
pub struct UseVariableResolver {
    pipeline: Arc<ResolutionPipeline>,
    parser: MustacheParser,
    conditions: ConditionEvaluator,
}

impl UseVariableResolver {
    pub fn new(pipeline: Arc<ResolutionPipeline>) -> Self {
        UseVariableResolver {
            pipeline,
            parser: MustacheParser::new(),
            conditions: ConditionEvaluator::new(),
        }
    }

    pub fn resolve(&self, variable: &UseVariable, context: &Context) -> Result<Value> {
        let expression = variable.expression();
        let not_resolved = |reason: String| ResolutionError::VariableNotResolved {
            variable: variable.name().to_string(),
            expression: expression.to_string(),
            reason: Some(reason),
        };

        let tokens = self.parser.parse(expression)?;
        let Some(token) = tokens.first() else {
            return Err(not_resolved("Invalid mustache expression".to_string()).into());
        };

        let value = match self.pipeline.resolve(token, context) {
            Ok(value) => value,
            Err(MustacheError::Resolution(e @ ResolutionError::Unresolvable { .. })) => {
                return Err(not_resolved(format!(
                    "No resolver could handle the expression: {}",
                    e
                ))
                .into());
            }
            Err(e) => return Err(e),
        };

        if value.is_null() {
            return Err(not_resolved("Mustache expression resolved to null".to_string()).into());
        }

        if let Some(condition) = variable.condition() {
            self.conditions
                .evaluate(variable.name(), &value, condition, expression)?;
        }

        debug!(variable = variable.name(), "resolved USE variable");
        Ok(value)
    }

    /// Every declaration in order; the first failure aborts.
    pub fn resolve_all(
        &self,
        compound: &CompoundExpression,
        context: &Context,
    ) -> Result<IndexMap<String, Value>> {
        compound
            .variables()
            .iter()
            .map(|variable| -> Result<(String, Value)> {
                Ok((variable.name().to_string(), self.resolve(variable, context)?))
            })
            .collect()
    }
}

/// Statement plus the values that went into it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundResolution {
    pub statement: String,
    #[serde(serialize_with = "serialize_values")]
    pub variables: IndexMap<String, Value>,
    pub original: String,
}

fn serialize_values<S: serde::Serializer>(
    values: &IndexMap<String, Value>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    let mut map = serializer.serialize_map(Some(values.len()))?;
    for (name, value) in values {
        map.serialize_entry(name, &crate::json::to_json(value))?;
    }
    map.end()
}

/// Outcome of [`CompoundResolver::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Parses a `USE` template, resolves its variables and fills the statement.
#[derive(Debug, Clone)]
pub struct CompoundResolver {
    parser: CompoundParser,
    variables: UseVariableResolver,
    replacer: LocalVariableReplacer,
}

impl CompoundResolver {
    pub fn new(pipeline: Arc<ResolutionPipeline>) -> Self {
        CompoundResolver {
            parser: CompoundParser::new(),
            variables: UseVariableResolver::new(pipeline),
            replacer: LocalVariableReplacer::new(),
        }
    }

    pub fn is_compound(&self, template: &str) -> bool {
        self.parser.is_compound(template)
    }

    /// The statement with every `{name}` substituted.
    pub fn resolve(&self, template: &str, context: &Context) -> Result<String> {
        Ok(self.resolve_detailed(template, context)?.statement)
    }

    pub fn resolve_detailed(&self, template: &str, context: &Context) -> Result<CompoundResolution> {
        let compound = self.parser.parse(template)?;
        let variables = self.variables.resolve_all(&compound, context)?;
        let statement = self.replacer.replace(compound.statement(), &variables);

        Ok(CompoundResolution {
            statement,
            variables,
            original: compound.original().to_string(),
        })
    }

    /// Like [`resolve`](Self::resolve), but a failed condition yields `None`.
    /// Every other error still propagates.
    pub fn try_resolve(&self, template: &str, context: &Context) -> Result<Option<String>> {
        match self.resolve(template, context) {
            Ok(statement) => Ok(Some(statement)),
            Err(MustacheError::Resolution(e)) if e.is_condition_not_met() => {
                debug!(error = %e, "USE condition not met");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Static check without resolving anything: syntax, and `{name}`
    /// references with no declaration.
    pub fn validate(&self, template: &str) -> ValidationReport {
        let mut errors = Vec::new();

        match self.parser.parse(template) {
            Ok(compound) => {
                let used = self.parser.extract_local_variables(compound.statement());
                let undeclared = self
                    .parser
                    .find_undeclared(&compound.variable_names(), &used);
                if !undeclared.is_empty() {
                    let names: Vec<String> =
                        undeclared.iter().map(|n| format!("{{{}}}", n)).collect();
                    errors.push(format!(
                        "Undeclared variables used in statement: {}",
                        names.join(", ")
                    ));
                }
            }
            Err(e) => errors.push(e.to_string()),
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }
}
