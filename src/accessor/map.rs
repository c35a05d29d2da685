use std::borrow::Cow;

use super::DataAccessor;
use crate::{error::Result, value::Value};

/// List/map source over a [`Value`] tree.
#[derive(Debug, Clone, Default)]
pub struct MapAccessor {
    data: Value,
}

impl MapAccessor {
    pub fn new(data: impl Into<Value>) -> Self {
        MapAccessor { data: data.into() }
    }

    pub fn from_json(json: serde_json::Value) -> Self {
        MapAccessor {
            data: crate::json::from_json(json),
        }
    }
}

impl DataAccessor for MapAccessor {
    fn get(&self, path: &str) -> Result<Value> {
        Ok(self.data.lookup_path(path.split('.')))
    }

    fn keys(&self) -> Vec<String> {
        self.data.keys()
    }

    fn source_type(&self) -> &str {
        "array"
    }

    fn raw(&self) -> Cow<'_, Value> {
        Cow::Borrowed(&self.data)
    }
}
