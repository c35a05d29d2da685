//! Data sources that placeholders are resolved against.
//!
//! Every accessor walks dot paths segment by segment and yields
//! [`Value::Null`] as soon as a hop is missing.

pub mod map;
pub mod model;
pub mod object;

pub use map::MapAccessor;
pub use model::{Model, ModelAccessor};
pub use object::ObjectAccessor;

use std::{borrow::Cow, fmt};

use crate::{error::Result, value::Value};

/// Dot-path lookup over an external data source.
pub trait DataAccessor: fmt::Debug + Send + Sync {
    /// Resolve `a.b.c`; any missing hop yields `Null`.
    fn get(&self, path: &str) -> Result<Value>;

    fn has(&self, path: &str) -> bool {
        self.get(path).map(|v| !v.is_null()).unwrap_or(false)
    }

    /// Top-level keys.
    fn keys(&self) -> Vec<String>;

    fn source_type(&self) -> &str;

    /// The underlying structure, for resolvers that walk it directly.
    fn raw(&self) -> Cow<'_, Value>;

    /// Access check for walks over [`DataAccessor::raw`], which bypass `get`.
    fn check_path(&self, _path: &str) -> Result<()> {
        Ok(())
    }
}
