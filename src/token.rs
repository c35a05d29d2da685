//! # Placeholder tokens
//!
//! A template such as `Hello {{User.name}}!` contains placeholders. The
//! text between the braces (`User.name`) is classified into an immutable
//! [`Token`] that the resolver pipeline can dispatch on.
//!
//! ## Submodules
//!
//! - **[kind]** - The [`TokenType`] enum and its capability flags
//! - **[classifier]** - The ordered scanner that turns raw text into tokens
//! - **[collection]** - [`TokenCollection`], filtering helpers over parsed tokens
//!
//! ## Classification order
//!
//! First match wins:
//!
//! ```text
//! User.name ?? 'n/a'          NULL_COALESCE
//! NOW:format('Y-m-d')         TEMPORAL
//! upper(User.name)            FUNCTION
//! $count                      VARIABLE
//! 2 + 3                       MATH
//! User.name                   MODEL / RELATION / TABLE / DYNAMIC / COLLECTION
//! ```
//!
//! ## Prefix and field path
//!
//! The first path segment is the *prefix*; the remaining segments form the
//! *field path*. For `User.address.city` the prefix is `User` and the field
//! path is `address.city`.
pub mod classifier;
pub mod collection;
pub mod kind;

pub use classifier::TokenClassifier;
pub use collection::TokenCollection;
pub use kind::TokenType;

use std::collections::BTreeMap;

use crate::value::Value;

/// A classified placeholder.
///
/// `raw` never contains the surrounding `{{` / `}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    raw: String,
    token_type: TokenType,
    path: Vec<String>,
    function_name: Option<String>,
    function_args: Vec<Value>,
    default_value: Option<String>,
    metadata: BTreeMap<String, String>,
}

impl Token {
    pub fn new(raw: impl Into<String>, token_type: TokenType, path: Vec<String>) -> Self {
        Token {
            raw: raw.into(),
            token_type,
            path,
            function_name: None,
            function_args: Vec::new(),
            default_value: None,
            metadata: BTreeMap::new(),
        }
    }

    /// Classify raw placeholder content.
    pub fn parse(raw: &str) -> Self {
        TokenClassifier.classify(raw)
    }

    pub fn with_function(mut self, name: Option<String>, args: Vec<Value>) -> Self {
        self.function_name = name;
        self.function_args = args;
        self
    }

    pub fn with_default(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn with_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    /// Merge metadata entries, overwriting existing keys.
    pub fn with_metadata<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The placeholder as it appears in the template.
    pub fn full(&self) -> String {
        format!("{{{{{}}}}}", self.raw)
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn prefix(&self) -> &str {
        self.path.first().map(String::as_str).unwrap_or("")
    }

    pub fn field_path(&self) -> &[String] {
        self.path.get(1..).unwrap_or(&[])
    }

    pub fn is_dynamic(&self) -> bool {
        self.path.iter().any(|segment| segment.starts_with('$'))
    }

    pub fn function_name(&self) -> Option<&str> {
        self.function_name.as_deref()
    }

    pub fn function_args(&self) -> &[Value] {
        &self.function_args
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}
