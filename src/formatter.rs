//! # Value formatters
//!
//! Named transformations applied to resolved values, e.g. `uppercase` or
//! `round(2)`. The set of names is closed: a formatter whose name is not on
//! [`ALLOWED_FORMATTERS`] cannot be registered, which keeps templates from
//! reaching arbitrary host code.
//!
//! - **[datetime]** - `toTimeString`, `toDateString`, `toDateTime`, `toUnixTime`, `toIso8601`, `formatDate`
//! - **[numeric]** - `toInt`, `toFloat`, `toCents`, `fromCents`, `round`, `floor`, `ceil`, `number`, `percent`, `abs`
//! - **[string]** - `uppercase`, `lowercase`, `trim`, `substr`, `replace`, `concat`, `slug`, `camel`, `snake`, `title`

pub mod datetime;
pub mod numeric;
pub mod string;

pub use datetime::DateFormatter;
pub use numeric::NumericFormatter;
pub use string::StringFormatter;

use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{error::FormatterError, json, value::Value};

pub const ALLOWED_FORMATTERS: [&str; 26] = [
    // date/time
    "toTimeString",
    "toDateString",
    "toDateTime",
    "toUnixTime",
    "toIso8601",
    "formatDate",
    // numeric
    "toInt",
    "toFloat",
    "toCents",
    "fromCents",
    "round",
    "floor",
    "ceil",
    "number",
    "percent",
    "abs",
    // string
    "uppercase",
    "lowercase",
    "trim",
    "substr",
    "replace",
    "concat",
    "slug",
    "camel",
    "snake",
    "title",
];

/// A named value transformation.
pub trait Formatter: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// [`Value::type_name`]s accepted; empty accepts everything.
    fn supported_types(&self) -> &[&str] {
        &[]
    }

    fn supports(&self, value: &Value) -> bool {
        let types = self.supported_types();
        types.is_empty() || types.contains(&value.type_name())
    }

    /// Transform `value`; an `Err` carries the failure reason.
    fn format(&self, value: &Value, args: &[Value]) -> Result<Value, String>;
}

/// Registered formatters, restricted to [`ALLOWED_FORMATTERS`].
#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    formatters: IndexMap<String, Arc<dyn Formatter>>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        FormatterRegistry::default()
    }

    /// Every built-in formatter.
    pub fn with_defaults() -> Self {
        let mut registry = FormatterRegistry::new();
        let builtins = DateFormatter::ALL
            .iter()
            .map(|f| Arc::new(*f) as Arc<dyn Formatter>)
            .chain(NumericFormatter::ALL.iter().map(|f| Arc::new(*f) as Arc<dyn Formatter>))
            .chain(StringFormatter::ALL.iter().map(|f| Arc::new(*f) as Arc<dyn Formatter>));

        for formatter in builtins {
            registry
                .formatters
                .insert(formatter.name().to_string(), formatter);
        }
        registry
    }

    pub fn register(&mut self, formatter: Arc<dyn Formatter>) -> Result<&mut Self, FormatterError> {
        let name = formatter.name().to_string();
        if !self.is_allowed(&name) {
            return Err(FormatterError::not_allowed(&name, &ALLOWED_FORMATTERS));
        }
        self.formatters.insert(name, formatter);
        Ok(self)
    }

    pub fn is_allowed(&self, name: &str) -> bool {
        ALLOWED_FORMATTERS.contains(&name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&dyn Formatter, FormatterError> {
        match self.formatters.get(name) {
            Some(formatter) => Ok(formatter.as_ref()),
            None if !self.is_allowed(name) => {
                Err(FormatterError::not_allowed(name, &ALLOWED_FORMATTERS))
            }
            None => Err(FormatterError::not_registered(name)),
        }
    }

    pub fn apply(&self, name: &str, value: &Value, args: &[Value]) -> Result<Value, FormatterError> {
        let formatter = self.get(name)?;
        if !formatter.supports(value) {
            return Err(FormatterError::unsupported_type(name, value.type_name()));
        }
        formatter
            .format(value, args)
            .map_err(|reason| FormatterError::failed(name, json::encode(value), reason))
    }

    pub fn registered_names(&self) -> Vec<&str> {
        self.formatters.keys().map(String::as_str).collect()
    }

    pub fn allowed_names(&self) -> &'static [&'static str] {
        &ALLOWED_FORMATTERS
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}

/// Argument `index` as text, or `default`.
pub(crate) fn arg_str(args: &[Value], index: usize, default: &str) -> String {
    match args.get(index) {
        Some(Value::Null) | None => default.to_string(),
        Some(value) => value.to_template_string(),
    }
}

/// Argument `index` as an integer, or `default`.
pub(crate) fn arg_int(args: &[Value], index: usize, default: i64) -> i64 {
    match args.get(index) {
        Some(Value::Null) | None => default,
        Some(value) => numeric::to_number(value).as_i64(),
    }
}

/// Text form used by the string formatters.
pub(crate) fn to_text(value: &Value) -> String {
    match value {
        Value::Array(_) | Value::Object(_) => json::encode(value),
        other => other.to_template_string(),
    }
}
