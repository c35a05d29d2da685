use indexmap::IndexMap;
use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{json, token::TokenCollection, value::Value};

/// Outcome of translating one template.
///
/// A failed result has no translated text; it names the offending
/// placeholders in `missing_fields` and the reasons in `errors`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationResult {
    success: bool,
    original: String,
    translated: Option<String>,
    tokens: TokenCollection,
    resolved_values: IndexMap<String, Value>,
    missing_fields: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
}

impl TranslationResult {
    pub fn success(original: impl Into<String>, translated: impl Into<String>) -> Self {
        TranslationResult {
            success: true,
            original: original.into(),
            translated: Some(translated.into()),
            tokens: TokenCollection::default(),
            resolved_values: IndexMap::new(),
            missing_fields: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failed(original: impl Into<String>, missing_fields: Vec<String>, errors: Vec<String>) -> Self {
        TranslationResult {
            success: false,
            translated: None,
            missing_fields,
            errors,
            ..TranslationResult::success(original, String::new())
        }
    }

    pub(crate) fn with_tokens(mut self, tokens: TokenCollection) -> Self {
        self.tokens = tokens;
        self
    }

    pub(crate) fn with_resolved_values(mut self, values: IndexMap<String, Value>) -> Self {
        self.resolved_values = values;
        self
    }

    /// Non-strict runs record the placeholders they blanked out here too.
    pub(crate) fn with_missing_fields(mut self, missing: Vec<String>) -> Self {
        self.missing_fields = missing;
        self
    }

    pub(crate) fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn is_failed(&self) -> bool {
        !self.success
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn translated(&self) -> Option<&str> {
        self.translated.as_deref()
    }

    pub fn tokens(&self) -> &TokenCollection {
        &self.tokens
    }

    /// Raw placeholder content to resolved value.
    pub fn resolved_values(&self) -> &IndexMap<String, Value> {
        &self.resolved_values
    }

    pub fn missing_fields(&self) -> &[String] {
        &self.missing_fields
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// `None` for a successful result.
    pub fn failure_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        let reason = if !self.missing_fields.is_empty() {
            format!("Missing fields: {}", self.missing_fields.join(", "))
        } else if !self.errors.is_empty() {
            self.errors.join("; ")
        } else {
            "Unknown error".to_string()
        };
        Some(reason)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for TranslationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let values: serde_json::Map<String, serde_json::Value> = self
            .resolved_values
            .iter()
            .map(|(raw, value)| (raw.clone(), json::to_json(value)))
            .collect();

        let mut state = serializer.serialize_struct("TranslationResult", 9)?;
        state.serialize_field("success", &self.success)?;
        state.serialize_field("original", &self.original)?;
        state.serialize_field("translated", &self.translated)?;
        state.serialize_field("tokens", &self.tokens.raw_strings())?;
        state.serialize_field("resolved_values", &values)?;
        state.serialize_field("missing_fields", &self.missing_fields)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("failure_reason", &self.failure_reason())?;
        state.end()
    }
}
