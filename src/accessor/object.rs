use std::{borrow::Cow, sync::Arc};

use super::DataAccessor;
use crate::{error::Result, record::Record, value::Value};

/// Generic object source; each hop goes through the lookup-strategy cascade.
#[derive(Debug, Clone)]
pub struct ObjectAccessor {
    root: Value,
}

impl ObjectAccessor {
    pub fn new(record: Arc<dyn Record>) -> Self {
        ObjectAccessor {
            root: Value::Opaque(record),
        }
    }

    pub fn from_record<R: Record + 'static>(record: R) -> Self {
        ObjectAccessor::new(Arc::new(record))
    }
}

impl DataAccessor for ObjectAccessor {
    fn get(&self, path: &str) -> Result<Value> {
        Ok(self.root.lookup_path(path.split('.')))
    }

    fn keys(&self) -> Vec<String> {
        self.root.keys()
    }

    fn source_type(&self) -> &str {
        "object"
    }

    fn raw(&self) -> Cow<'_, Value> {
        Cow::Borrowed(&self.root)
    }
}
