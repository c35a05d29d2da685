use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    context::Context,
    error::{ResolutionError, Result, SecurityError},
    formatter::FormatterRegistry,
    resolver::Resolver,
    token::{Token, TokenType, classifier::split_path},
    value::Value,
};

/// A host function callable from templates; `Err` carries the reason.
pub type HostFunction = Arc<dyn Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync>;

/// Named functions registered by the host.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: IndexMap<String, HostFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&HostFunction> {
        self.functions.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.functions.keys()).finish()
    }
}

/// `name(arg, ...)` calls.
///
/// Host functions take precedence over formatters of the same name. For a
/// formatter the first argument is the value and the rest are its options.
/// Bare (unquoted, non-literal) arguments are read from the context first.
#[derive(Debug, Clone)]
pub struct FunctionResolver {
    functions: FunctionRegistry,
    formatters: Arc<FormatterRegistry>,
}

impl Default for FunctionResolver {
    fn default() -> Self {
        FunctionResolver {
            functions: FunctionRegistry::new(),
            formatters: Arc::new(FormatterRegistry::with_defaults()),
        }
    }
}

impl FunctionResolver {
    pub fn new(functions: FunctionRegistry) -> Self {
        FunctionResolver {
            functions,
            ..FunctionResolver::default()
        }
    }

    pub fn with_formatters(mut self, formatters: Arc<FormatterRegistry>) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    fn arguments(&self, token: &Token, context: &Context) -> Result<Vec<Value>> {
        let references: Vec<usize> = token
            .meta("reference_args")
            .unwrap_or_default()
            .split(',')
            .filter_map(|i| i.parse().ok())
            .collect();

        let mut args = token.function_args().to_vec();
        for index in references {
            if let Some(Value::String(reference)) = args.get(index).cloned() {
                args[index] = lookup_reference(&reference, context)?;
            }
        }
        Ok(args)
    }
}

impl Resolver for FunctionResolver {
    fn name(&self) -> &str {
        "function"
    }

    fn priority(&self) -> i32 {
        80
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Function]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        let name = token.function_name().unwrap_or_default();
        let args = self.arguments(token, context)?;

        if let Some(function) = self.functions.get(name) {
            return function(&args).map_err(|reason| {
                ResolutionError::ForToken {
                    raw: token.raw().to_string(),
                    reason,
                }
                .into()
            });
        }

        if self.formatters.is_allowed(name) {
            let (value, options) = match args.split_first() {
                Some((value, options)) => (value.clone(), options),
                None => (Value::Null, &[][..]),
            };
            return Ok(self.formatters.apply(name, &value, options)?);
        }

        Err(SecurityError::UnregisteredFunction {
            name: name.to_string(),
        }
        .into())
    }
}

/// `$var`, a full dot path, or the path without its prefix.
fn lookup_reference(reference: &str, context: &Context) -> Result<Value> {
    if let Some(name) = reference.strip_prefix('$') {
        return Ok(context.variables().get(name).cloned().unwrap_or(Value::Null));
    }

    let value = context.get(reference)?;
    if !value.is_null() {
        return Ok(value);
    }

    let path = split_path(reference);
    if path.len() < 2 {
        return Ok(Value::Null);
    }
    context.accessor().get(&path[1..].join("."))
}
