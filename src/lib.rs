//! Resolves `{{placeholder}}` templates against structured data.
//!
//! A template is split into placeholders, each placeholder is classified
//! into a [`Token`], and a priority-ordered [`ResolutionPipeline`] turns
//! tokens into [`Value`]s that are substituted back into the text.
//!
//! Besides data paths, placeholders can hold function calls, variables,
//! arithmetic, null-coalescing defaults and temporal predicates such as
//! `{{TEMPORAL:isDue('weekday && 08:00-18:00')}}`. Compound `USE` templates
//! bind resolved values to local names before filling a statement.

pub mod accessor;
pub mod cache;
pub mod cli;
pub mod compound;
pub mod config;
pub mod context;
pub mod error;
pub mod formatter;
pub mod json;
pub mod math;
pub mod parser;
pub mod record;
pub mod resolver;
pub mod resolvers;
pub mod result;
pub mod security;
pub mod temporal;
pub mod token;
pub mod translator;
pub mod value;

pub use accessor::{DataAccessor, MapAccessor, Model, ModelAccessor, ObjectAccessor};
pub use cache::{Cache, MemoryCache, NullCache};
pub use compound::{CompoundExpression, CompoundResolver, UseVariable, ValidationReport};
pub use config::{CacheConfig, ResolverConfig};
pub use context::Context;
pub use error::{
    ConfigError, FormatterError, MathError, MustacheError, ResolutionError, Result, SecurityError,
    SyntaxError, UseSyntaxError,
};
pub use formatter::{Formatter, FormatterRegistry};
pub use math::MathEvaluator;
pub use parser::MustacheParser;
pub use record::Record;
pub use resolver::{PipelineBuilder, ResolutionPipeline, Resolver};
pub use result::TranslationResult;
pub use security::SecurityPolicy;
pub use temporal::{ConditionRegistry, TemporalExpression, TimeRange};
pub use token::{Token, TokenCollection, TokenType};
pub use translator::MustacheResolver;
pub use value::{Map, Value};
