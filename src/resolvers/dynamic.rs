use crate::{
    context::Context,
    error::{ResolutionError, Result},
    resolver::{Resolver, navigate},
    token::{Token, TokenType},
    value::Value,
};

/// `Model.$indicator.path`: the indicator path yields a field name that is
/// then read from the top level of the source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicFieldResolver;

impl Resolver for DynamicFieldResolver {
    fn name(&self) -> &str {
        "dynamic"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Dynamic]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        let path = token.field_path();
        let Some(index) = path.iter().position(|s| s.starts_with('$')) else {
            return Ok(Value::Null);
        };

        let mut indicator: Vec<String> = path[index..].to_vec();
        indicator[0] = path[index][1..].to_string();

        match navigate(&indicator, context)? {
            Value::Null => Ok(Value::Null),
            Value::String(field) => context.accessor().get(&field),
            other => Err(ResolutionError::ForToken {
                raw: token.raw().to_string(),
                reason: format!(
                    "Dynamic field indicator must resolve to string, got: {}",
                    other.type_name()
                ),
            }
            .into()),
        }
    }
}
