//! Host objects that take part in dot-path lookups.
//!
//! A [`Record`] exposes up to four lookup capabilities. Path walking tries
//! them in the fixed order given by [`LookupStrategy::ORDER`] and stops at
//! the first one that produces a value.

use std::fmt;

use crate::value::Value;

/// A host object reachable from a data source.
///
/// Every capability is optional; the defaults report "not found".
pub trait Record: fmt::Debug + Send + Sync {
    /// Short type name, e.g. `User`.
    fn type_name(&self) -> &str;

    /// Direct field / property access.
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Named getter method, e.g. `getFullName`.
    fn getter(&self, _method: &str) -> Option<Value> {
        None
    }

    /// Indexed or keyed container access.
    fn keyed(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Catch-all dynamic lookup.
    fn catch_all(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Elements when the record is iterable.
    fn items(&self) -> Option<Vec<Value>> {
        None
    }

    fn field_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// One step of the duck-typed lookup cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    DirectField,
    Getter,
    Keyed,
    CatchAll,
}

impl LookupStrategy {
    pub const ORDER: [LookupStrategy; 4] = [
        LookupStrategy::DirectField,
        LookupStrategy::Getter,
        LookupStrategy::Keyed,
        LookupStrategy::CatchAll,
    ];

    pub fn apply(self, record: &dyn Record, segment: &str) -> Option<Value> {
        match self {
            LookupStrategy::DirectField => record.field(segment),
            LookupStrategy::Getter => record.getter(&getter_name(segment)),
            LookupStrategy::Keyed => record.keyed(segment),
            LookupStrategy::CatchAll => record.catch_all(segment),
        }
    }
}

/// `name` -> `getName`
pub fn getter_name(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}
