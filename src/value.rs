use std::{borrow::Cow, fmt, sync::Arc};

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::record::{LookupStrategy, Record};

/// Insertion-ordered map used for keyed containers.
pub type Map = IndexMap<String, Value>;

/// Standard `Y-m-d H:i:s` rendering used wherever a date-time becomes text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A dynamically typed value flowing from a data source through the
/// resolvers and formatters.
///
/// The resolver pipeline is type-checked end to end through this enum:
/// accessors produce it, resolvers return it, formatters consume it and the
/// translator stringifies it.
///
/// # Absent values
///
/// [`Value::Null`] doubles as "absent". A dot-path lookup that misses any
/// hop yields `Null`, and resolvers return `Null` when they claim a token
/// but find nothing.
///
/// # Examples
///
/// ```
/// use mustache_resolver::{Map, Value};
///
/// let mut user = Map::new();
/// user.insert("name".to_string(), Value::from("Ann"));
/// let root = Value::Object(user);
///
/// assert_eq!(root.lookup("name"), Value::from("Ann"));
/// assert!(root.lookup("email").is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent / null
    #[default]
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Integer number (kept apart from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Wall-clock date-time
    DateTime(NaiveDateTime),

    /// Ordered list of values
    Array(Vec<Value>),

    /// Keyed container preserving insertion order
    Object(Map),

    /// Host object reached through the lookup-strategy cascade
    Opaque(Arc<dyn Record>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            Value::Float(n) => Some(*n as i64),
            _ => None,
        }
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "bool",
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Opaque(record) => record.type_name(),
        }
    }

    /// Look up one path segment: object key, list index, or the
    /// lookup-strategy cascade for host objects. Misses yield `Null`.
    pub fn lookup(&self, segment: &str) -> Value {
        self.lookup_ref(segment).into_owned()
    }

    /// [`Value::lookup`] that borrows when the child lives inside `self`.
    pub fn lookup_ref(&self, segment: &str) -> Cow<'_, Value> {
        match self {
            Value::Object(map) => found(map.get(segment)),
            Value::Array(items) => found(segment.parse::<usize>().ok().and_then(|i| items.get(i))),
            Value::Opaque(record) => Cow::Owned(
                LookupStrategy::ORDER
                    .iter()
                    .find_map(|strategy| strategy.apply(record.as_ref(), segment))
                    .unwrap_or(Value::Null),
            ),
            _ => Cow::Owned(Value::Null),
        }
    }

    /// Walk a dot path segment by segment; any missing hop yields `Null`.
    ///
    /// Only the value at the end of the path is cloned.
    pub fn lookup_path<'a, I>(&self, segments: I) -> Value
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut current = Cow::Borrowed(self);
        for segment in segments {
            if current.is_null() {
                return Value::Null;
            }
            current = step(current, |value| value.lookup_ref(segment));
        }
        current.into_owned()
    }

    /// Elements of an iterable value, or `None` for scalars.
    pub fn items(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.clone()),
            Value::Object(map) => Some(map.values().cloned().collect()),
            Value::Opaque(record) => record.items(),
            _ => None,
        }
    }

    /// Top-level keys of a keyed value.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(map) => map.keys().cloned().collect(),
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            Value::Opaque(record) => record.field_names(),
            _ => Vec::new(),
        }
    }

    /// Text used when a resolved value is substituted into a template.
    ///
    /// Absent and keyed values render empty, lists join their items with
    /// `", "`.
    pub fn to_template_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            Value::Array(items) => items
                .iter()
                .map(Value::to_template_string)
                .collect::<Vec<_>>()
                .join(", "),
            Value::Object(_) | Value::Opaque(_) => String::new(),
        }
    }
}

/// Render a float the way scripting hosts print numbers: whole floats
/// without a trailing `.0`.
pub fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (String(a), String(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Object(a), Object(b)) => a == b,
            (Opaque(a), Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_template_string())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Borrow `value` when present, otherwise an owned `Null`.
pub fn found(value: Option<&Value>) -> Cow<'_, Value> {
    value.map_or(Cow::Owned(Value::Null), Cow::Borrowed)
}

/// Apply `pick` to a possibly borrowed value, keeping the borrow when there
/// is one. An owned parent only gives up the picked child.
pub fn step<'a, F>(current: Cow<'a, Value>, pick: F) -> Cow<'a, Value>
where
    F: for<'v> Fn(&'v Value) -> Cow<'v, Value>,
{
    match current {
        Cow::Borrowed(value) => pick(value),
        Cow::Owned(value) => Cow::Owned(pick(&value).into_owned()),
    }
}

/// Whether `s` is a numeric string: optional sign, digits with at most one
/// decimal point, optional exponent. Surrounding whitespace is ignored.
pub fn is_numeric(s: &str) -> bool {
    let bytes = s.trim().as_bytes();
    let mut i = 0;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == bytes.len()
}

/// Decode a numeric string: float when it contains a `.`, integer otherwise.
pub fn parse_numeric(s: &str) -> Option<Value> {
    if !is_numeric(s) {
        return None;
    }
    let s = s.trim();
    if s.contains('.') {
        return s.parse::<f64>().ok().map(Value::Float);
    }
    match s.parse::<i64>() {
        Ok(n) => Some(Value::Integer(n)),
        Err(_) => s.parse::<f64>().ok().map(|f| Value::Integer(f as i64)),
    }
}
