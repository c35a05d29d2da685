use std::borrow::Cow;

use crate::{
    context::Context,
    error::Result,
    resolver::{Resolver, prefix_matches},
    token::{Token, TokenType},
    value::{Value, found, is_numeric, step},
};

const FIRST: &str = "first";
const LAST: &str = "last";
const WILDCARD: &str = "*";

/// Indexed, `first` / `last` and `*` access over the raw source structure.
///
/// The walk bypasses the accessor's dot-path lookup so that wildcards can
/// fan out. A wildcard collects the remaining sub-path of every element and
/// skips elements where it is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionResolver;

impl Resolver for CollectionResolver {
    fn name(&self) -> &str {
        "collection"
    }

    fn priority(&self) -> i32 {
        40
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Collection]
    }

    fn resolve(&self, token: &Token, context: &Context) -> Result<Value> {
        if !prefix_matches(token, context) {
            return Ok(Value::Null);
        }

        let field_path = token.field_path();
        let accessor = context.accessor();
        accessor.check_path(&field_path.join("."))?;
        let mut current = accessor.raw();

        for (index, segment) in field_path.iter().enumerate() {
            if current.is_null() {
                return Ok(Value::Null);
            }

            current = match segment.as_str() {
                WILDCARD => return Ok(wildcard(&current, &field_path[index + 1..])),
                FIRST => step(current, first),
                LAST => step(current, last),
                s if is_numeric(s) => step(current, |value| by_index(value, s)),
                s => step(current, |value| value.lookup_ref(s)),
            };
        }

        Ok(current.into_owned())
    }
}

fn wildcard(collection: &Value, rest: &[String]) -> Value {
    let lookup = |item: &Value| item.lookup_path(rest.iter().map(String::as_str));
    let values: Vec<Value> = match collection {
        Value::Array(items) => items.iter().map(lookup).collect(),
        Value::Object(map) => map.values().map(lookup).collect(),
        other => match other.items() {
            Some(items) => items.iter().map(lookup).collect(),
            None => return Value::Array(Vec::new()),
        },
    };
    Value::Array(values.into_iter().filter(|value| !value.is_null()).collect())
}

fn first(collection: &Value) -> Cow<'_, Value> {
    match collection {
        Value::Array(items) => found(items.first()),
        Value::Object(map) => found(map.values().next()),
        other => Cow::Owned(other.items().and_then(|items| items.into_iter().next()).into()),
    }
}

fn last(collection: &Value) -> Cow<'_, Value> {
    match collection {
        Value::Array(items) => found(items.last()),
        Value::Object(map) => found(map.values().last()),
        other => Cow::Owned(other.items().and_then(|items| items.into_iter().last()).into()),
    }
}

/// Numeric segment: list position, or the same text as a map key.
fn by_index<'v>(collection: &'v Value, segment: &str) -> Cow<'v, Value> {
    let index = segment.trim().parse::<f64>().map(|n| n as i64).unwrap_or(0);
    match collection {
        Value::Array(items) => found(usize::try_from(index).ok().and_then(|i| items.get(i))),
        Value::Object(map) => found(map.get(&index.to_string())),
        Value::Opaque(record) => Cow::Owned(record.keyed(&index.to_string()).into()),
        _ => Cow::Owned(Value::Null),
    }
}
