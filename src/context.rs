use std::sync::Arc;

use crate::{
    accessor::{DataAccessor, MapAccessor},
    error::Result,
    value::{Map, Value},
};

/// Everything a resolver may consult for one translation.
///
/// Contexts are immutable; the `with_*` methods return modified copies.
/// Variables shadow accessor data on lookup.
#[derive(Debug, Clone)]
pub struct Context {
    accessor: Arc<dyn DataAccessor>,
    variables: Map,
    strict: bool,
    expected_prefix: Option<String>,
    config: Map,
}

impl Context {
    pub fn new<A: DataAccessor + 'static>(accessor: A) -> Self {
        Context::from_accessor(Arc::new(accessor))
    }

    pub fn from_accessor(accessor: Arc<dyn DataAccessor>) -> Self {
        Context {
            accessor,
            variables: Map::new(),
            strict: true,
            expected_prefix: None,
            config: Map::new(),
        }
    }

    /// Context over plain list/map data.
    pub fn from_value(data: impl Into<Value>) -> Self {
        Context::new(MapAccessor::new(data))
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        Context::new(MapAccessor::from_json(json))
    }

    /// Variables first, then the accessor.
    pub fn get(&self, key: &str) -> Result<Value> {
        match self.variables.get(key) {
            Some(value) => Ok(value.clone()),
            None => self.accessor.get(key),
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key) || self.accessor.has(key)
    }

    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.variables.insert(key.into(), value.into());
        next
    }

    pub fn with_accessor<A: DataAccessor + 'static>(&self, accessor: A) -> Self {
        Context {
            accessor: Arc::new(accessor),
            ..self.clone()
        }
    }

    pub fn with_strict(&self, strict: bool) -> Self {
        Context {
            strict,
            ..self.clone()
        }
    }

    pub fn with_prefix(&self, prefix: Option<&str>) -> Self {
        Context {
            expected_prefix: prefix.map(str::to_string),
            ..self.clone()
        }
    }

    /// Merge entries into the config map, overwriting existing keys.
    pub fn with_config<I, K>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut next = self.clone();
        next.config
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        next
    }

    pub fn accessor(&self) -> &dyn DataAccessor {
        self.accessor.as_ref()
    }

    pub fn variables(&self) -> &Map {
        &self.variables
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn expected_prefix(&self) -> Option<&str> {
        self.expected_prefix.as_deref()
    }

    pub fn config(&self, key: &str) -> Option<&Value> {
        self.config.get(key)
    }

    pub fn config_or(&self, key: &str, default: Value) -> Value {
        self.config.get(key).cloned().unwrap_or(default)
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::from_value(Value::Object(Map::new()))
    }
}
