use std::{fmt, sync::Arc};

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike};
use indexmap::IndexMap;

use crate::{
    context::Context,
    error::{ResolutionError, Result},
    resolver::Resolver,
    temporal::{
        Clock, ConditionRegistry, CronExpr, CronSchedule, Evaluator, SystemClock,
        TemporalExpression, calendar,
        expression::is_weekend,
        format::{ATOM, DEFAULT_DATE, DEFAULT_DATETIME, format_date},
    },
    token::{Token, TokenType},
    value::Value,
};

/// `TEMPORAL:`, `NOW` and `TODAY` placeholders.
///
/// "Now" comes from an injectable [`Clock`]. Custom keyword evaluators
/// registered here (and on the optional [`ConditionRegistry`]) are seeded
/// into every expression built for `isDue`.
#[derive(Clone)]
pub struct TemporalResolver {
    clock: Arc<dyn Clock>,
    registry: Option<Arc<ConditionRegistry>>,
    evaluators: IndexMap<String, Evaluator>,
}

impl Default for TemporalResolver {
    fn default() -> Self {
        TemporalResolver {
            clock: Arc::new(SystemClock),
            registry: None,
            evaluators: IndexMap::new(),
        }
    }
}

impl TemporalResolver {
    pub fn new() -> Self {
        TemporalResolver::default()
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_registry(mut self, registry: Arc<ConditionRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn register_evaluator<F>(mut self, keyword: impl Into<String>, evaluator: F) -> Self
    where
        F: Fn(&NaiveDateTime) -> bool + Send + Sync + 'static,
    {
        self.evaluators.insert(keyword.into(), Arc::new(evaluator));
        self
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    fn expression(&self, source: &str) -> TemporalExpression {
        let mut expression = match &self.registry {
            Some(registry) => registry.create_expression(source),
            None => TemporalExpression::new(source),
        };
        for (keyword, evaluator) in &self.evaluators {
            expression.register_shared(keyword.clone(), evaluator.clone());
        }
        expression
    }

    fn resolve_temporal(&self, token: &Token) -> Result<Value> {
        let args = token.function_args();
        // whole call text, so `nth:saturday:1,3` is not split at the comma
        let expression = token.meta("expression").unwrap_or_default();
        let now = self.now();

        match token.function_name().unwrap_or_default() {
            "isDue" => Ok(self.expression(expression).evaluate(&now)?.into()),
            "nextRun" => {
                let next = cron_for(expression, "nextRun")?.next_run(&now);
                Ok(next.map(format_datetime).into())
            }
            "previousRun" => {
                let previous = cron_for(expression, "previousRun")?.previous_run(&now);
                Ok(previous.map(format_datetime).into())
            }
            "isNthWeekday" => {
                let [day, occurrence, ..] = args else {
                    return Err(message("isNthWeekday requires 2 arguments: dayOfWeek, occurrence"));
                };
                let occurrence = occurrence
                    .as_int()
                    .or_else(|| occurrence.to_template_string().trim().parse().ok())
                    .unwrap_or(0);
                Ok(calendar::is_nth_weekday(&day.to_template_string(), occurrence, &now)?.into())
            }
            "isLastWeekday" => {
                let Some(day) = args.first() else {
                    return Err(message("isLastWeekday requires 1 argument: dayOfWeek"));
                };
                Ok(calendar::is_last_weekday(&day.to_template_string(), &now)?.into())
            }
            other => Err(message(format!("Unknown TEMPORAL function: {}", other))),
        }
    }

    fn resolve_now(&self, token: &Token) -> Result<Value> {
        let now = self.now();
        let value: Value = match token.function_name().unwrap_or("default") {
            "default" | "datetime" => format_datetime(now).into(),
            "format" => format_date(&now, &format_arg(token, DEFAULT_DATETIME)).into(),
            "timestamp" => now.and_utc().timestamp().into(),
            "iso8601" | "atom" | "rfc3339" => format_date(&now, ATOM).into(),
            "date" => format_date(&now, DEFAULT_DATE).into(),
            "time" => format_date(&now, "H:i:s").into(),
            "dayOfWeek" => now.weekday().num_days_from_sunday().into(),
            "dayOfMonth" => now.day().into(),
            "month" => now.month().into(),
            "year" => Value::Integer(i64::from(now.year())),
            "hour" => now.hour().into(),
            "minute" => now.minute().into(),
            "second" => now.second().into(),
            "isWeekday" => (!is_weekend(&now)).into(),
            "isWeekend" => is_weekend(&now).into(),
            other => return Err(message(format!("Unknown NOW function: {}", other))),
        };
        Ok(value)
    }

    fn resolve_today(&self, token: &Token) -> Result<Value> {
        let today = self.now().date().and_time(NaiveTime::MIN);
        let value: Value = match token.function_name().unwrap_or("default") {
            "default" => format_date(&today, DEFAULT_DATE).into(),
            "format" => format_date(&today, &format_arg(token, DEFAULT_DATE)).into(),
            "startOfDay" => format_datetime(today).into(),
            "endOfDay" => format_date(&today, "Y-m-d 23:59:59").into(),
            "timestamp" => today.and_utc().timestamp().into(),
            "dayOfWeek" => today.weekday().num_days_from_sunday().into(),
            "dayOfMonth" => today.day().into(),
            "dayOfYear" => today.ordinal().into(),
            "weekOfYear" => today.iso_week().week().into(),
            "month" => today.month().into(),
            "year" => Value::Integer(i64::from(today.year())),
            "isWeekday" => (!is_weekend(&today)).into(),
            "isWeekend" => is_weekend(&today).into(),
            "isFirstDayOfMonth" => (today.day() == 1).into(),
            "isLastDayOfMonth" => {
                (today.day() == calendar::days_in_month(today.year(), today.month())).into()
            }
            other => return Err(message(format!("Unknown TODAY function: {}", other))),
        };
        Ok(value)
    }
}

impl fmt::Debug for TemporalResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporalResolver")
            .field("clock", &self.clock)
            .field("registry", &self.registry)
            .field("evaluators", &self.evaluators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Resolver for TemporalResolver {
    fn name(&self) -> &str {
        "temporal"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Temporal]
    }

    fn resolve(&self, token: &Token, _context: &Context) -> Result<Value> {
        match token.meta("temporal_type").unwrap_or("unknown") {
            "temporal" => self.resolve_temporal(token),
            "now" => self.resolve_now(token),
            "today" => self.resolve_today(token),
            other => Err(message(format!("Unknown temporal type: {}", other))),
        }
    }
}

fn message(text: impl Into<String>) -> crate::error::MustacheError {
    ResolutionError::message(text).into()
}

fn format_datetime(at: NaiveDateTime) -> String {
    format_date(&at, DEFAULT_DATETIME)
}

fn format_arg(token: &Token, default: &str) -> String {
    token
        .function_args()
        .first()
        .map(Value::to_template_string)
        .unwrap_or_else(|| default.to_string())
}

fn cron_for(expression: &str, function: &str) -> Result<CronExpr> {
    match expression.strip_prefix("cron:") {
        Some(spec) => Ok(CronExpr::parse(spec)?),
        None => Err(message(format!(
            "{} requires a CRON expression (cron:...)",
            function
        ))),
    }
}
