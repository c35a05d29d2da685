use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CompoundExpression, UseVariable};
use crate::error::UseSyntaxError;

/// `USE <block> && <statement>`; the statement may be empty here and is
/// rejected afterwards with its own hint.
static USE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^USE\s+(.+?)\s*&&\s*(.*)$").expect("use clause pattern"));

/// `{name} => {{expr}}` with an optional trailing condition.
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\{(\w+)\}\s*=>\s*(\{\{[^}]+\}\})(\s*(?:[><=!]+|BETWEEN)\s*[^\s,]+(?:\s+AND\s+[^\s,]+)?)?",
    )
    .expect("use declaration pattern")
});

pub(crate) static LOCAL_VARIABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("local variable pattern"));

/// Splits compound templates into declarations and statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundParser;

impl CompoundParser {
    pub fn new() -> Self {
        CompoundParser
    }

    pub fn is_compound(&self, template: &str) -> bool {
        template.trim().starts_with("USE ")
    }

    pub fn parse(&self, template: &str) -> Result<CompoundExpression, UseSyntaxError> {
        let trimmed = template.trim();
        if !self.is_compound(trimmed) {
            return Err(UseSyntaxError::new(template, "Template must start with \"USE \""));
        }

        let Some(caps) = USE_CLAUSE.captures(trimmed) else {
            return Err(UseSyntaxError::new(
                template,
                "Missing \"&&\" separator between USE clause and statement",
            ));
        };
        let block = caps.get(1).map_or("", |m| m.as_str().trim());
        let statement = caps.get(2).map_or("", |m| m.as_str().trim());

        if statement.is_empty() {
            return Err(UseSyntaxError::new(
                template,
                "Statement after \"&&\" cannot be empty",
            ));
        }

        let variables = self.declarations(block, template)?;
        if variables.is_empty() {
            return Err(UseSyntaxError::new(
                template,
                "USE clause must declare at least one variable",
            ));
        }

        Ok(CompoundExpression::new(variables, statement, template))
    }

    fn declarations(&self, block: &str, template: &str) -> Result<Vec<UseVariable>, UseSyntaxError> {
        let mut matches = DECLARATION.captures_iter(block).peekable();
        if matches.peek().is_none() {
            return Err(UseSyntaxError::new(
                template,
                "Invalid variable declaration format. Expected: {varname} => {{expression}}",
            ));
        }

        let mut seen = HashSet::new();
        let mut variables = Vec::new();
        for caps in matches {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let expression = caps.get(2).map_or("", |m| m.as_str());
            let condition = caps
                .get(3)
                .map(|m| m.as_str().trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string);

            if !seen.insert(name) {
                return Err(UseSyntaxError::new(
                    template,
                    format!("Duplicate variable name: {{{}}}", name),
                ));
            }
            variables.push(UseVariable::new(name, expression, condition));
        }
        Ok(variables)
    }

    /// Distinct `{name}` references in order of first use.
    pub fn extract_local_variables(&self, statement: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for caps in LOCAL_VARIABLE.captures_iter(statement) {
            if let Some(name) = caps.get(1)
                && !names.iter().any(|n| n == name.as_str())
            {
                names.push(name.as_str().to_string());
            }
        }
        names
    }

    /// Names in `used` that are not in `declared`.
    pub fn find_undeclared(&self, declared: &[&str], used: &[String]) -> Vec<String> {
        used.iter()
            .filter(|name| !declared.contains(&name.as_str()))
            .cloned()
            .collect()
    }
}
