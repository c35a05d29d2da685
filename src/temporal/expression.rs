use std::{fmt, sync::Arc};

use chrono::{Datelike, NaiveDateTime, Weekday};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use tracing::trace;

use super::{
    BUILTIN_KEYWORDS,
    ast::Node,
    calendar,
    cron::{CronExpr, CronSchedule},
    parser::ExpressionParser,
    time_range::TimeRange,
};
use crate::error::{ResolutionError, Result};

/// Host predicate backing a custom keyword.
pub type Evaluator = Arc<dyn Fn(&NaiveDateTime) -> bool + Send + Sync>;

/// A temporal expression parsed once and evaluated at any instant.
///
/// Registering an evaluator drops the cached tree so the next evaluation
/// re-parses.
///
/// ```
/// use chrono::NaiveDate;
/// use mustache_resolver::temporal::TemporalExpression;
///
/// let at = NaiveDate::from_ymd_opt(2025, 12, 10)
///     .unwrap()
///     .and_hms_opt(9, 30, 0)
///     .unwrap();
/// let expr = TemporalExpression::new("weekday && 08:00-18:00");
/// assert!(expr.evaluate(&at).unwrap());
/// ```
#[derive(Clone)]
pub struct TemporalExpression {
    expression: String,
    evaluators: IndexMap<String, Evaluator>,
    ast: OnceCell<Node>,
}

impl TemporalExpression {
    pub fn new(expression: impl Into<String>) -> Self {
        TemporalExpression {
            expression: expression.into(),
            evaluators: IndexMap::new(),
            ast: OnceCell::new(),
        }
    }

    pub fn evaluate(&self, at: &NaiveDateTime) -> Result<bool> {
        let ast = self
            .ast
            .get_or_try_init(|| ExpressionParser::new(&self.expression).parse())?;
        self.evaluate_node(ast, at)
    }

    pub fn register_evaluator<F>(&mut self, keyword: impl Into<String>, evaluator: F) -> &mut Self
    where
        F: Fn(&NaiveDateTime) -> bool + Send + Sync + 'static,
    {
        self.register_shared(keyword, Arc::new(evaluator))
    }

    pub fn register_shared(&mut self, keyword: impl Into<String>, evaluator: Evaluator) -> &mut Self {
        self.evaluators.insert(keyword.into(), evaluator);
        self.ast = OnceCell::new();
        self
    }

    pub fn has_evaluator(&self, keyword: &str) -> bool {
        self.evaluators.contains_key(keyword)
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn registered_keywords(&self) -> Vec<String> {
        self.evaluators.keys().cloned().collect()
    }

    /// Every condition text the expression mentions, built-ins included.
    pub fn used_keywords(&self) -> Result<Vec<String>> {
        Ok(ExpressionParser::new(&self.expression).extract_keywords()?)
    }

    /// Custom keywords used but not registered.
    pub fn missing_evaluators(&self) -> Result<Vec<String>> {
        let missing = self
            .used_keywords()?
            .into_iter()
            .filter(|keyword| !is_self_evaluating(keyword) && !self.has_evaluator(keyword))
            .collect();
        Ok(missing)
    }

    fn evaluate_node(&self, node: &Node, at: &NaiveDateTime) -> Result<bool> {
        let result = match node {
            Node::And(operands) => {
                let mut all = true;
                for operand in operands {
                    if !self.evaluate_node(operand, at)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            Node::Or(operands) => {
                let mut any = false;
                for operand in operands {
                    if self.evaluate_node(operand, at)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            Node::Not(operand) => !self.evaluate_node(operand, at)?,
            Node::Keyword(keyword) => evaluate_keyword(keyword, at)?,
            Node::TimeRange(range) => TimeRange::from_string(range)?.contains(at),
            Node::Cron(spec) => CronExpr::parse(spec)?.is_due(at),
            Node::NthWeekday { day, occurrences } => {
                calendar::is_any_nth_weekday(day, occurrences, at)?
            }
            Node::LastWeekday(day) => calendar::is_last_weekday(day, at)?,
            Node::Custom(keyword) => match self.evaluators.get(keyword) {
                Some(evaluator) => evaluator(at),
                None => {
                    return Err(ResolutionError::message(format!(
                        "No evaluator registered for custom condition: \"{}\"",
                        keyword
                    ))
                    .into());
                }
            },
            Node::Literal(value) => *value,
        };

        trace!(node = ?node, %at, result, "temporal node");
        Ok(result)
    }
}

impl fmt::Debug for TemporalExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporalExpression")
            .field("expression", &self.expression)
            .field("evaluators", &self.evaluators.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub(crate) fn is_weekend(at: &NaiveDateTime) -> bool {
    matches!(at.weekday(), Weekday::Sat | Weekday::Sun)
}

fn evaluate_keyword(keyword: &str, at: &NaiveDateTime) -> Result<bool> {
    match keyword {
        "always" => Ok(true),
        "never" => Ok(false),
        "weekday" => Ok(!is_weekend(at)),
        "weekend" => Ok(is_weekend(at)),
        _ => Err(ResolutionError::message(format!("Unknown keyword: {}", keyword)).into()),
    }
}

/// Built-ins and prefixed conditions need no registered evaluator.
fn is_self_evaluating(keyword: &str) -> bool {
    BUILTIN_KEYWORDS.contains(&keyword)
        || keyword.starts_with("cron:")
        || keyword.starts_with("nth:")
        || keyword.starts_with("last:")
        || (keyword.contains(':') && keyword.contains('-'))
}
