//! `USE` clauses: bind mustache values to local names, check them, and
//! substitute them into a statement.
//!
//! ```text
//! USE {max_power} => {{CommandCenter.max_power}} > 0 && SELECT * WHERE power < {max_power}
//! ```
//!
//! Local names use single braces (`{name}`) and never collide with
//! `{{mustache}}` placeholders.

pub mod condition;
pub mod expression;
pub mod parser;
pub mod replacer;
pub mod resolver;

pub use condition::ConditionEvaluator;
pub use expression::{CompoundExpression, UseVariable};
pub use parser::CompoundParser;
pub use replacer::LocalVariableReplacer;
pub use resolver::{CompoundResolution, CompoundResolver, UseVariableResolver, ValidationReport};
