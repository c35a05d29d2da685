use serde::Deserialize;

use crate::error::SecurityError;

/// Default attribute deny-list applied by [`SecurityPolicy::recommended`].
pub const DEFAULT_BLACKLIST: [&str; 4] = ["password", "remember_token", "api_token", "secret"];

/// Access rules consulted by data accessors.
///
/// An empty allow-list admits every source. The deny-list is checked
/// against the first path segment only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SecurityPolicy {
    #[serde(alias = "allowed_models")]
    pub allowed_sources: Vec<String>,
    pub blacklisted_attributes: Vec<String>,
    pub max_depth: usize,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        SecurityPolicy {
            allowed_sources: Vec::new(),
            blacklisted_attributes: Vec::new(),
            max_depth: 10,
        }
    }
}

impl SecurityPolicy {
    /// All sources allowed, common credential attributes denied.
    pub fn recommended() -> Self {
        SecurityPolicy {
            blacklisted_attributes: DEFAULT_BLACKLIST.iter().map(|s| s.to_string()).collect(),
            ..SecurityPolicy::default()
        }
    }

    pub fn allow(mut self, source: impl Into<String>) -> Self {
        self.allowed_sources.push(source.into());
        self
    }

    pub fn deny_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.blacklisted_attributes.push(attribute.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Accept `name` when it, or its short name, is on the allow-list.
    pub fn validate_source(&self, name: &str) -> Result<(), SecurityError> {
        if self.allowed_sources.is_empty() {
            return Ok(());
        }
        let short = short_name(name);
        if self
            .allowed_sources
            .iter()
            .any(|allowed| allowed == name || allowed == short)
        {
            return Ok(());
        }
        Err(SecurityError::ModelNotAllowed {
            model: name.to_string(),
            allowed: self.allowed_sources.clone(),
        })
    }

    pub fn is_attribute_blacklisted(&self, attribute: &str) -> bool {
        self.blacklisted_attributes.iter().any(|a| a == attribute)
    }

    pub fn is_depth_exceeded(&self, depth: usize) -> bool {
        depth > self.max_depth
    }

    /// Deny-list on the first segment, then the depth limit.
    pub fn check_path(&self, path: &str) -> Result<(), SecurityError> {
        let segments: Vec<&str> = path.split('.').collect();
        if let Some(first) = segments.first()
            && self.is_attribute_blacklisted(first)
        {
            return Err(SecurityError::RestrictedPath {
                path: path.to_string(),
            });
        }
        if self.is_depth_exceeded(segments.len()) {
            return Err(SecurityError::DepthExceeded {
                path: path.to_string(),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }
}

/// `App\Models\User` -> `User`, `crate::models::User` -> `User`
pub fn short_name(name: &str) -> &str {
    let after_backslash = name.rsplit('\\').next().unwrap_or(name);
    after_backslash.rsplit("::").next().unwrap_or(after_backslash)
}
