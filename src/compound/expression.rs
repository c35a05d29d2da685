use serde::Serialize;

/// One declaration of a `USE` clause, e.g. `{max_power} => {{CommandCenter.max_power}} > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseVariable {
    name: String,
    expression: String,
    condition: Option<String>,
}

impl UseVariable {
    pub fn new(
        name: impl Into<String>,
        expression: impl Into<String>,
        condition: Option<String>,
    ) -> Self {
        UseVariable {
            name: name.into(),
            expression: expression.into(),
            condition,
        }
    }

    /// Name without braces.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `{{...}}` expression, braces included.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// `> 0`, `BETWEEN 1 AND 100`, ...
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// How the variable is referenced in a statement.
    pub fn reference(&self) -> String {
        format!("{{{}}}", self.name)
    }
}

/// A parsed `USE ... && statement` template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundExpression {
    variables: Vec<UseVariable>,
    statement: String,
    original: String,
}

impl CompoundExpression {
    pub fn new(
        variables: Vec<UseVariable>,
        statement: impl Into<String>,
        original: impl Into<String>,
    ) -> Self {
        CompoundExpression {
            variables,
            statement: statement.into(),
            original: original.into(),
        }
    }

    /// Declarations in source order.
    pub fn variables(&self) -> &[UseVariable] {
        &self.variables
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn has_conditions(&self) -> bool {
        self.variables.iter().any(UseVariable::has_condition)
    }

    pub fn variable(&self, name: &str) -> Option<&UseVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(UseVariable::name).collect()
    }
}
