use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    error::SyntaxError,
    token::{Token, TokenClassifier, TokenCollection},
};

/// A `{{...}}` span whose content holds no braces.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern"));
static EMPTY_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*\}\}").expect("empty placeholder pattern"));
static NESTED_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[^}]*\{\{").expect("nested placeholder pattern"));

/// Extracts and classifies the placeholders of a template.
#[derive(Debug, Clone, Copy, Default)]
pub struct MustacheParser {
    classifier: TokenClassifier,
}

impl MustacheParser {
    pub fn new() -> Self {
        MustacheParser::default()
    }

    /// Validate the template and classify each placeholder in order of
    /// appearance.
    pub fn parse(&self, template: &str) -> Result<TokenCollection, SyntaxError> {
        validate(template)?;

        let tokens: Vec<Token> = PLACEHOLDER
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|content| content.as_str().trim())
            .filter(|content| !content.is_empty())
            .map(|content| self.classifier.classify(content))
            .collect();

        debug!(count = tokens.len(), "parsed template placeholders");
        Ok(TokenCollection::new(tokens))
    }

    pub fn has_mustaches(&self, template: &str) -> bool {
        PLACEHOLDER.is_match(template)
    }

    /// Every placeholder including its braces.
    pub fn extract_raw<'a>(&self, template: &'a str) -> Vec<&'a str> {
        PLACEHOLDER
            .find_iter(template)
            .map(|m| m.as_str())
            .collect()
    }

    /// Replace each placeholder with `replacement(content)`, where content is
    /// trimmed; `None` keeps the placeholder as written.
    pub fn substitute<F>(&self, template: &str, mut replacement: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        PLACEHOLDER
            .replace_all(template, |caps: &regex::Captures<'_>| {
                replacement(caps[1].trim()).unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Brace balance, then empty placeholders, then nesting.
fn validate(template: &str) -> Result<(), SyntaxError> {
    let opens = template.matches("{{").count();
    let closes = template.matches("}}").count();

    if opens != closes {
        let position = if opens > closes {
            template.rfind("{{")
        } else {
            template.rfind("}}")
        };
        return Err(SyntaxError::UnclosedMustache {
            template: template.to_string(),
            position: position.unwrap_or(0),
        });
    }

    if let Some(m) = EMPTY_PLACEHOLDER.find(template) {
        return Err(SyntaxError::EmptyMustache {
            template: template.to_string(),
            position: m.start(),
        });
    }

    if let Some(m) = NESTED_PLACEHOLDER.find(template) {
        return Err(SyntaxError::NestedMustache {
            template: template.to_string(),
            position: m.start(),
        });
    }

    Ok(())
}
