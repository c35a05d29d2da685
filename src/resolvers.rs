//! Built-in [`Resolver`](crate::resolver::Resolver) strategies.
//!
//! | Resolver       | Priority | Token type     |
//! |----------------|----------|----------------|
//! | temporal       | 90       | TEMPORAL       |
//! | null_coalesce  | 90       | NULL_COALESCE  |
//! | function       | 80       | FUNCTION       |
//! | math           | 70       | MATH           |
//! | variable       | 60       | VARIABLE       |
//! | dynamic        | 50       | DYNAMIC        |
//! | collection     | 40       | COLLECTION     |
//! | relation       | 30       | RELATION       |
//! | model          | 20       | MODEL          |
//! | table          | 10       | TABLE          |
//!
//! `function` and `math` are opt-in; the rest form the default set.

pub mod collection;
pub mod dynamic;
pub mod function;
pub mod math;
pub mod null_coalesce;
pub mod path;
pub mod temporal;
pub mod variable;

pub use collection::CollectionResolver;
pub use dynamic::DynamicFieldResolver;
pub use function::{FunctionRegistry, FunctionResolver, HostFunction};
pub use math::MathResolver;
pub use null_coalesce::NullCoalesceResolver;
pub use path::{ModelResolver, RelationResolver, TableResolver};
pub use temporal::TemporalResolver;
pub use variable::VariableResolver;

use std::sync::Arc;

use crate::resolver::Resolver;

/// The eight default resolvers in registration order.
pub fn defaults() -> Vec<Arc<dyn Resolver>> {
    vec![
        Arc::new(TemporalResolver::new()),
        Arc::new(NullCoalesceResolver),
        Arc::new(VariableResolver),
        Arc::new(DynamicFieldResolver),
        Arc::new(CollectionResolver),
        Arc::new(RelationResolver),
        Arc::new(ModelResolver),
        Arc::new(TableResolver),
    ]
}
