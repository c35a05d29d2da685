use std::{collections::HashMap, sync::Arc, time::Duration};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{
    accessor::{Model, ModelAccessor},
    cache::{Cache, MemoryCache, NullCache},
    compound::CompoundResolver,
    config::ResolverConfig,
    context::Context,
    error::Result,
    parser::MustacheParser,
    resolver::{PipelineBuilder, ResolutionPipeline},
    resolvers::FunctionResolver,
    result::TranslationResult,
    security::SecurityPolicy,
    token::TokenCollection,
    value::Value,
};

/// Translates templates against a context.
///
/// Syntax errors are returned as `Err`. Per-placeholder resolution errors
/// follow the context's mode: strict translation stops at the first one and
/// returns a failed [`TranslationResult`]; non-strict translation blanks the
/// placeholder, records a warning and still succeeds.
///
/// ```
/// use mustache_resolver::{Context, MustacheResolver};
///
/// let resolver = MustacheResolver::default();
/// let context = Context::from_json(serde_json::json!({"name": "Ann"}));
/// let result = resolver.translate("Hello {{User.name}}!", &context).unwrap();
/// assert_eq!(result.translated(), Some("Hello Ann!"));
/// ```
#[derive(Debug, Clone)]
pub struct MustacheResolver {
    parser: MustacheParser,
    pipeline: Arc<ResolutionPipeline>,
    cache: Arc<dyn Cache<TokenCollection>>,
    cache_prefix: String,
    cache_ttl: Option<Duration>,
    strict: bool,
    keep_unresolved: bool,
    security: SecurityPolicy,
    compound: CompoundResolver,
}

impl Default for MustacheResolver {
    fn default() -> Self {
        MustacheResolver::new(PipelineBuilder::new().build())
    }
}

impl MustacheResolver {
    pub fn new(pipeline: ResolutionPipeline) -> Self {
        let pipeline = Arc::new(pipeline);
        MustacheResolver {
            parser: MustacheParser::new(),
            compound: CompoundResolver::new(pipeline.clone()),
            pipeline,
            cache: Arc::new(NullCache),
            cache_prefix: String::new(),
            cache_ttl: None,
            strict: true,
            keep_unresolved: false,
            security: SecurityPolicy::recommended(),
        }
    }

    /// Pipeline with exclusions, custom resolvers and host functions, plus
    /// cache and security settings.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = PipelineBuilder::new();
        if !config.functions.is_empty() {
            builder = builder.add_resolver(FunctionResolver::new(config.functions.clone()));
        }
        for resolver in &config.resolvers {
            builder = builder.add_shared(resolver.clone());
        }
        let pipeline = builder
            .exclude(config.excluded_resolvers.iter().cloned())
            .build();
        debug!(resolvers = ?pipeline.resolver_names(), "built resolution pipeline");

        let mut resolver = MustacheResolver::new(pipeline)
            .with_strict(config.strict)
            .with_keep_unresolved(config.keep_unresolved)
            .with_security(config.security.clone());
        if config.cache.enabled {
            resolver = resolver.with_cache(
                Arc::new(MemoryCache::new()),
                config.cache.prefix.clone(),
                config.cache.ttl(),
            );
        }
        Ok(resolver)
    }

    pub fn with_cache(
        mut self,
        cache: Arc<dyn Cache<TokenCollection>>,
        prefix: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        self.cache = cache;
        self.cache_prefix = prefix.into();
        self.cache_ttl = ttl;
        self
    }

    /// Mode of contexts built by [`context`](Self::context).
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_keep_unresolved(mut self, keep: bool) -> Self {
        self.keep_unresolved = keep;
        self
    }

    pub fn with_security(mut self, security: SecurityPolicy) -> Self {
        self.security = security;
        self
    }

    pub fn pipeline(&self) -> &ResolutionPipeline {
        &self.pipeline
    }

    /// `USE ... && ...` templates, sharing this resolver's pipeline.
    pub fn compound(&self) -> &CompoundResolver {
        &self.compound
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// A context over plain data in this resolver's mode.
    pub fn context(&self, data: impl Into<Value>) -> Context {
        Context::from_value(data).with_strict(self.strict)
    }

    /// A context over a model, guarded by this resolver's security policy.
    pub fn model_context(&self, model: Model) -> Context {
        Context::new(ModelAccessor::new(model).with_policy(self.security.clone()))
            .with_strict(self.strict)
    }

    pub fn has_mustaches(&self, template: &str) -> bool {
        self.parser.has_mustaches(template)
    }

    /// Tokens of `template`, served from the cache when enabled.
    pub fn parse(&self, template: &str) -> Result<TokenCollection> {
        let key = format!("{}{}", self.cache_prefix, template);
        if let Some(tokens) = self.cache.get(&key) {
            debug!(template, "parsed tokens served from cache");
            return Ok(tokens);
        }

        let tokens = self.parser.parse(template)?;
        self.cache.set(&key, tokens.clone(), self.cache_ttl);
        Ok(tokens)
    }

    pub fn translate(&self, template: &str, context: &Context) -> Result<TranslationResult> {
        // a lone `{{` still goes through the parser so it is reported
        if !template.contains("{{") && !template.contains("}}") {
            return Ok(TranslationResult::success(template, template));
        }

        let tokens = self.parse(template)?;
        let strict = context.is_strict();

        let mut replacements: HashMap<String, Option<String>> = HashMap::new();
        let mut resolved: IndexMap<String, Value> = IndexMap::new();
        let mut missing = Vec::new();
        let mut warnings = Vec::new();

        for token in &tokens {
            match self.pipeline.resolve(token, context) {
                Ok(value) => {
                    replacements.insert(token.raw().to_string(), Some(value.to_template_string()));
                    resolved.insert(token.raw().to_string(), value);
                }
                Err(e) if e.is_syntax() => return Err(e),
                Err(e) if strict => {
                    debug!(raw = token.raw(), error = %e, "strict translation failed");
                    return Ok(TranslationResult::failed(
                        template,
                        vec![token.raw().to_string()],
                        vec![e.to_string()],
                    ));
                }
                Err(e) => {
                    warn!(raw = token.raw(), error = %e, "placeholder left unresolved");
                    let kept = (!self.keep_unresolved).then(String::new);
                    replacements.insert(token.raw().to_string(), kept);
                    missing.push(token.raw().to_string());
                    warnings.push(e.to_string());
                }
            }
        }

        let translated = self
            .parser
            .substitute(template, |content| replacements.get(content).cloned().flatten());

        Ok(TranslationResult::success(template, translated)
            .with_tokens(tokens)
            .with_resolved_values(resolved)
            .with_missing_fields(missing)
            .with_warnings(warnings))
    }

    /// [`translate`](Self::translate) over a context built from plain data.
    pub fn translate_value(&self, template: &str, data: impl Into<Value>) -> Result<TranslationResult> {
        self.translate(template, &self.context(data))
    }

    /// Every template against one context; a syntax error in any of them
    /// aborts the batch.
    pub fn translate_batch<I, S>(&self, templates: I, context: &Context) -> Result<Vec<TranslationResult>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        templates
            .into_iter()
            .map(|template| self.translate(template.as_ref(), context))
            .collect()
    }
}
