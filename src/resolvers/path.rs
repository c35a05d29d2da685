use crate::{
    context::Context,
    error::Result,
    resolver::{Resolver, navigate, prefix_matches},
    token::{Token, TokenType},
    value::Value,
};

/// `Model.field`: the field path resolved against the accessor.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelResolver;

impl Resolver for ModelResolver {
    fn name(&self) -> &str {
        "model"
    }

    fn priority(&self) -> i32 {
        20
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Model]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        if !prefix_matches(token, context) || token.field_path().is_empty() {
            return Ok(Value::Null);
        }
        navigate(token.field_path(), context)
    }
}

/// `Model.relation.field`: needs at least two segments after the prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationResolver;

impl Resolver for RelationResolver {
    fn name(&self) -> &str {
        "relation"
    }

    fn priority(&self) -> i32 {
        30
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Relation]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        if !prefix_matches(token, context) || token.field_path().len() < 2 {
            return Ok(Value::Null);
        }
        navigate(token.field_path(), context)
    }
}

/// `table.column`: the prefix names the table, so the full path is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableResolver;

impl Resolver for TableResolver {
    fn name(&self) -> &str {
        "table"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Table]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        if token.field_path().is_empty() {
            return Ok(Value::Null);
        }
        navigate(token.path(), context)
    }
}
