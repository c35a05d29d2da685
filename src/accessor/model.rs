use std::{borrow::Cow, sync::Arc};

use super::DataAccessor;
use crate::{
    error::Result,
    record::Record,
    security::{SecurityPolicy, short_name},
    value::{Map, Value},
};

/// An ORM-style model: named attributes plus eagerly loaded relations.
///
/// Relations hold already-loaded values; nothing is fetched lazily while a
/// path is walked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    class: String,
    attributes: Map,
    relations: Map,
}

impl Model {
    pub fn new(class: impl Into<String>) -> Self {
        Model {
            class: class.into(),
            ..Model::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Attach a loaded relation: another model, a list of models or any value.
    pub fn with_relation(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.relations.insert(name.into(), value.into());
        self
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.class)
    }

    pub fn attributes(&self) -> &Map {
        &self.attributes
    }

    pub fn relations(&self) -> &Map {
        &self.relations
    }
}

impl Record for Model {
    fn type_name(&self) -> &str {
        self.short_name()
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.attributes.get(name).cloned()
    }

    fn catch_all(&self, name: &str) -> Option<Value> {
        self.relations.get(name).cloned()
    }

    fn field_names(&self) -> Vec<String> {
        self.attributes
            .keys()
            .chain(self.relations.keys())
            .cloned()
            .collect()
    }
}

impl From<Model> for Value {
    fn from(model: Model) -> Self {
        Value::Opaque(Arc::new(model))
    }
}

/// ORM-model source guarded by a [`SecurityPolicy`].
#[derive(Debug, Clone)]
pub struct ModelAccessor {
    model: Arc<Model>,
    policy: SecurityPolicy,
}

impl ModelAccessor {
    pub fn new(model: Model) -> Self {
        ModelAccessor {
            model: Arc::new(model),
            policy: SecurityPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: SecurityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn model_class(&self) -> &str {
        self.model.class()
    }

    pub fn model_name(&self) -> &str {
        self.model.short_name()
    }
}

impl DataAccessor for ModelAccessor {
    fn get(&self, path: &str) -> Result<Value> {
        self.check_path(path)?;

        let root = Value::Opaque(self.model.clone());
        Ok(root.lookup_path(path.split('.')))
    }

    fn keys(&self) -> Vec<String> {
        self.model.field_names()
    }

    fn source_type(&self) -> &str {
        self.model.class()
    }

    fn raw(&self) -> Cow<'_, Value> {
        Cow::Owned(Value::Opaque(self.model.clone()))
    }

    fn check_path(&self, path: &str) -> Result<()> {
        self.policy.validate_source(self.model.class())?;
        self.policy.check_path(path)?;
        Ok(())
    }
}
