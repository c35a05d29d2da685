//! # Temporal engine
//!
//! Boolean expressions over calendar and clock conditions, evaluated at a
//! given instant:
//!
//! ```text
//! weekday && 08:00-18:00 && !holiday
//! (nth:saturday:1,3 || last:friday) && cron:0 9 * * *
//! ```
//!
//! ## Submodules
//!
//! - **[parser]** - Tokenizer and recursive-descent parser producing [`Node`]
//! - **[expression]** - [`TemporalExpression`], parse-once evaluation with custom evaluators
//! - **[registry]** - [`ConditionRegistry`], keyword conditions and the shared default instance
//! - **[time_range]** - `HH:MM-HH:MM` ranges, overnight aware
//! - **[calendar]** - Nth / last weekday of month
//! - **[cron]** - [`CronSchedule`] and the `cron`-crate backed [`CronExpr`]
//! - **[clock]** - Injectable source of "now"
//! - **[format]** - `Y-m-d H:i:s` style date formatting
//!
//! ## Grammar
//!
//! `!` binds tightest, then `&&`, then `||`. An empty expression is always
//! true.
//!
//! ```text
//! or        := and ('||' and)*
//! and       := not ('&&' not)*
//! not       := '!' not | primary
//! primary   := '(' or ')' | condition
//! condition := 'cron:' SPEC | 'nth:' DAY ':' N[,N]* | 'last:' DAY
//!            | HH:MM-HH:MM | always | never | weekday | weekend | IDENT
//! ```
pub mod ast;
pub mod calendar;
pub mod clock;
pub mod cron;
pub mod expression;
pub mod format;
pub mod parser;
pub mod registry;
pub mod time_range;

pub use ast::Node;
pub use clock::{Clock, FixedClock, SystemClock};
pub use cron::{CronExpr, CronSchedule, nth_weekday_cron};
pub use expression::{Evaluator, TemporalExpression};
pub use parser::ExpressionParser;
pub use registry::{Condition, ConditionRegistry};
pub use time_range::TimeRange;

/// Keywords evaluated without any registration.
pub const BUILTIN_KEYWORDS: [&str; 4] = ["always", "never", "weekday", "weekend"];
