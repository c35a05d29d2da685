use crate::{
    context::Context,
    error::Result,
    resolver::Resolver,
    token::{Token, TokenType},
    value::Value,
};

/// `$name`: read from the context variables only, never the accessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableResolver;

impl Resolver for VariableResolver {
    fn name(&self) -> &str {
        "variable"
    }

    fn priority(&self) -> i32 {
        60
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Variable]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        Ok(token
            .path()
            .first()
            .and_then(|name| context.variables().get(name))
            .cloned()
            .unwrap_or(Value::Null))
    }
}
