//! Resolver configuration.
//!
//! Loaded from JSON and then overridden from the environment:
//!
//! | Variable                   | Field             |
//! |----------------------------|-------------------|
//! | `MUSTACHE_STRICT`          | `strict`          |
//! | `MUSTACHE_KEEP_UNRESOLVED` | `keep_unresolved` |
//! | `MUSTACHE_CACHE_ENABLED`   | `cache.enabled`   |
//! | `MUSTACHE_CACHE_TTL`       | `cache.ttl`       |

use std::{sync::Arc, time::Duration};

use serde::Deserialize;

use crate::{
    error::ConfigError,
    resolver::Resolver,
    resolvers::FunctionRegistry,
    security::SecurityPolicy,
};

/// Names of the resolvers that ship with the crate.
pub const BUILTIN_RESOLVERS: [&str; 10] = [
    "temporal",
    "null_coalesce",
    "function",
    "math",
    "variable",
    "dynamic",
    "collection",
    "relation",
    "model",
    "table",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Seconds; 0 never expires.
    pub ttl: u64,
    pub prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: false,
            ttl: 3600,
            prefix: "mustache_resolver_".to_string(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl > 0).then(|| Duration::from_secs(self.ttl))
    }
}

/// Everything [`MustacheResolver::from_config`](crate::MustacheResolver::from_config)
/// needs. Custom resolvers and host functions cannot come from JSON and are
/// attached in code.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub strict: bool,
    /// Non-strict only: keep `{{placeholder}}` instead of blanking it.
    pub keep_unresolved: bool,
    pub cache: CacheConfig,
    pub excluded_resolvers: Vec<String>,
    pub security: SecurityPolicy,
    #[serde(skip)]
    pub resolvers: Vec<Arc<dyn Resolver>>,
    #[serde(skip)]
    pub functions: FunctionRegistry,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            strict: true,
            keep_unresolved: false,
            cache: CacheConfig::default(),
            excluded_resolvers: Vec::new(),
            security: SecurityPolicy::recommended(),
            resolvers: Vec::new(),
            functions: FunctionRegistry::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::InvalidOption {
            key: "(root)".to_string(),
            reason: e.to_string(),
        })
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        ResolverConfig::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unset keys leave fields alone.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MUSTACHE_STRICT") {
            self.strict = parse_flag("MUSTACHE_STRICT", &v)?;
        }
        if let Some(v) = lookup("MUSTACHE_KEEP_UNRESOLVED") {
            self.keep_unresolved = parse_flag("MUSTACHE_KEEP_UNRESOLVED", &v)?;
        }
        if let Some(v) = lookup("MUSTACHE_CACHE_ENABLED") {
            self.cache.enabled = parse_flag("MUSTACHE_CACHE_ENABLED", &v)?;
        }
        if let Some(v) = lookup("MUSTACHE_CACHE_TTL") {
            self.cache.ttl = v.trim().parse().map_err(|_| ConfigError::InvalidOption {
                key: "MUSTACHE_CACHE_TTL".to_string(),
                reason: format!("expected a number of seconds, got \"{}\"", v),
            })?;
        }
        Ok(self)
    }

    /// Checked by `from_config`, once custom resolvers are attached.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.max_depth == 0 {
            return Err(ConfigError::InvalidOption {
                key: "security.max_depth".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let custom: Vec<&str> = self.resolvers.iter().map(|r| r.name()).collect();
        for name in &self.excluded_resolvers {
            if !BUILTIN_RESOLVERS.contains(&name.as_str()) && !custom.contains(&name.as_str()) {
                return Err(ConfigError::MissingResolver(name.clone()));
            }
        }
        Ok(())
    }

    pub fn add_resolver<R: Resolver + 'static>(mut self, resolver: R) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidOption {
            key: key.to_string(),
            reason: format!("expected a boolean, got \"{}\"", other),
        }),
    }
}
