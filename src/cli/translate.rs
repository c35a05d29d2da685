//! Translate a template against JSON input

use super::{CliError, input_context, parse_variable};
use crate::{
    MustacheResolver, ResolverConfig, TranslationResult,
    resolvers::{FunctionResolver, MathResolver},
};

/// Options for the translate command
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    pub template: String,
    /// JSON input string
    pub input: Option<String>,
    /// `key=value` variables
    pub vars: Vec<String>,
    /// Blank unresolved placeholders instead of failing
    pub lenient: bool,
}

/// Translate with the default resolvers plus arithmetic and formatter calls.
pub fn execute_translate(options: &TranslateOptions) -> Result<TranslationResult, CliError> {
    let config = ResolverConfig::from_env()?
        .add_resolver(MathResolver::new())
        .add_resolver(FunctionResolver::default());
    let resolver = MustacheResolver::from_config(&config)?;

    let mut context = input_context(options.input.as_deref())?
        .with_strict(config.strict && !options.lenient);
    for spec in &options.vars {
        let (key, value) = parse_variable(spec)?;
        context = context.with(key, value);
    }

    Ok(resolver.translate(&options.template, &context)?)
}
