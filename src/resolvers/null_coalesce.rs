use crate::{
    context::Context,
    error::Result,
    resolver::{Resolver, navigate},
    token::{Token, TokenType},
    value::Value,
};

/// `Model.field ?? 'fallback'`: the default is returned verbatim as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCoalesceResolver;

impl Resolver for NullCoalesceResolver {
    fn name(&self) -> &str {
        "null_coalesce"
    }

    fn priority(&self) -> i32 {
        90
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::NullCoalesce]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        let value = if token.field_path().is_empty() {
            Value::Null
        } else {
            navigate(token.field_path(), context)?
        };

        if value.is_null() {
            return Ok(token.default_value().into());
        }
        Ok(value)
    }
}
