//! Chain-of-responsibility dispatch from tokens to values.
//!
//! A [`ResolutionPipeline`] holds resolvers sorted by descending priority.
//! The first resolver whose [`Resolver::supports`] accepts a token owns it:
//! its result is final even when that result is [`Value::Null`].

use std::{cmp::Reverse, fmt, sync::Arc};

use tracing::debug;

use crate::{
    context::Context,
    error::{ResolutionError, Result},
    resolvers,
    token::{Token, TokenType},
    value::Value,
};

/// Strategy turning one kind of token into a value.
pub trait Resolver: fmt::Debug + Send + Sync {
    /// Stable identifier used by exclusion lists (e.g. "model").
    fn name(&self) -> &str;

    /// Higher runs first.
    fn priority(&self) -> i32 {
        50
    }

    fn supported_types(&self) -> &[TokenType];

    /// Type-only by default.
    fn supports(&self, token: &Token, _context: &Context) -> bool {
        self.supported_types().contains(&token.token_type())
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value>;
}

/// Join `path` with dots and look it up through the context's accessor.
pub fn navigate(path: &[String], context: &Context) -> Result<Value> {
    context.accessor().get(&path.join("."))
}

/// True when the context has no expected prefix or the token's prefix equals it.
pub fn prefix_matches(token: &Token, context: &Context) -> bool {
    match context.expected_prefix() {
        Some(expected) => token.prefix() == expected,
        None => true,
    }
}

/// Resolvers ordered by descending priority; ties keep registration order.
#[derive(Debug, Clone, Default)]
pub struct ResolutionPipeline {
    resolvers: Vec<Arc<dyn Resolver>>,
}

impl ResolutionPipeline {
    pub fn new(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        let mut pipeline = ResolutionPipeline { resolvers };
        pipeline.sort_by_priority();
        pipeline
    }

    pub fn add_resolver(&mut self, resolver: Arc<dyn Resolver>) -> &mut Self {
        self.resolvers.push(resolver);
        self.sort_by_priority();
        self
    }

    pub fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        let Some(resolver) = self.resolver_for(token, context) else {
            return Err(ResolutionError::Unresolvable {
                raw: token.raw().to_string(),
                token_type: token.token_type().as_str().to_string(),
            }
            .into());
        };

        debug!(token = token.raw(), resolver = resolver.name(), "dispatching token");
        resolver.resolve(token, context)
    }

    pub fn can_resolve(&self, token: &Token, context: &Context) -> bool {
        self.resolver_for(token, context).is_some()
    }

    pub fn resolver_for(&self, token: &Token, context: &Context) -> Option<&dyn Resolver> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.supports(token, context))
            .map(|resolver| resolver.as_ref())
    }

    pub fn resolvers(&self) -> &[Arc<dyn Resolver>] {
        &self.resolvers
    }

    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    fn sort_by_priority(&mut self) {
        // stable: equal priorities keep registration order
        self.resolvers.sort_by_key(|r| Reverse(r.priority()));
    }
}

/// Assembles a [`ResolutionPipeline`] from the default resolvers plus
/// caller-registered ones, minus exclusions.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    resolvers: Vec<Arc<dyn Resolver>>,
    include_defaults: bool,
    excluded: Vec<String>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        PipelineBuilder {
            resolvers: Vec::new(),
            include_defaults: true,
            excluded: Vec::new(),
        }
    }
}

impl PipelineBuilder {
    pub fn new() -> Self {
        PipelineBuilder::default()
    }

    pub fn with_defaults(mut self) -> Self {
        self.include_defaults = true;
        self
    }

    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    /// Drop resolvers by [`Resolver::name`], defaults and custom alike.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn add_resolver<R: Resolver + 'static>(self, resolver: R) -> Self {
        self.add_shared(Arc::new(resolver))
    }

    pub fn add_shared(mut self, resolver: Arc<dyn Resolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn build(self) -> ResolutionPipeline {
        let mut all = if self.include_defaults {
            resolvers::defaults()
        } else {
            Vec::new()
        };
        all.extend(self.resolvers);
        all.retain(|r| !self.excluded.iter().any(|name| name == r.name()));

        ResolutionPipeline::new(all)
    }
}
