use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, RwLock},
};

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use super::{
    clock::{Clock, SystemClock},
    expression::{Evaluator, TemporalExpression, is_weekend},
};

/// A named condition that can be checked at an instant.
pub trait Condition: fmt::Debug + Send + Sync {
    /// Keywords this condition answers to.
    fn keywords(&self) -> Vec<String>;

    fn evaluate(&self, at: &NaiveDateTime) -> bool;
}

#[derive(Debug, Clone, Copy)]
enum Builtin {
    Always,
    Never,
    Weekday,
    Weekend,
}

impl Condition for Builtin {
    fn keywords(&self) -> Vec<String> {
        let keyword = match self {
            Builtin::Always => "always",
            Builtin::Never => "never",
            Builtin::Weekday => "weekday",
            Builtin::Weekend => "weekend",
        };
        vec![keyword.to_string()]
    }

    fn evaluate(&self, at: &NaiveDateTime) -> bool {
        match self {
            Builtin::Always => true,
            Builtin::Never => false,
            Builtin::Weekday => !is_weekend(at),
            Builtin::Weekend => is_weekend(at),
        }
    }
}

struct CustomCondition {
    keyword: String,
    evaluator: Evaluator,
}

impl fmt::Debug for CustomCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCondition")
            .field("keyword", &self.keyword)
            .finish_non_exhaustive()
    }
}

impl Condition for CustomCondition {
    fn keywords(&self) -> Vec<String> {
        vec![self.keyword.clone()]
    }

    fn evaluate(&self, at: &NaiveDateTime) -> bool {
        (self.evaluator)(at)
    }
}

static DEFAULT: Lazy<Mutex<Arc<ConditionRegistry>>> =
    Lazy::new(|| Mutex::new(Arc::new(ConditionRegistry::new())));

/// Keyword conditions plus the custom evaluators copied into every
/// expression the registry creates.
///
/// All methods take `&self`; the registry is shared behind an `Arc`.
pub struct ConditionRegistry {
    conditions: RwLock<HashMap<String, Arc<dyn Condition>>>,
    evaluators: RwLock<IndexMap<String, Evaluator>>,
    clock: Arc<dyn Clock>,
}

impl ConditionRegistry {
    /// A fresh registry holding only the built-in keywords.
    pub fn new() -> Self {
        let registry = ConditionRegistry {
            conditions: RwLock::new(HashMap::new()),
            evaluators: RwLock::new(IndexMap::new()),
            clock: Arc::new(SystemClock),
        };
        for builtin in [Builtin::Always, Builtin::Never, Builtin::Weekday, Builtin::Weekend] {
            registry.register(Arc::new(builtin));
        }
        registry
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The process-wide shared registry. Repeated calls return the same
    /// instance until [`ConditionRegistry::reset_instance`].
    pub fn instance() -> Arc<ConditionRegistry> {
        match DEFAULT.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the shared registry with a fresh one.
    pub fn reset_instance() {
        let fresh = Arc::new(ConditionRegistry::new());
        match DEFAULT.lock() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }

    pub fn register(&self, condition: Arc<dyn Condition>) -> &Self {
        if let Ok(mut conditions) = self.conditions.write() {
            for keyword in condition.keywords() {
                conditions.insert(keyword, condition.clone());
            }
        }
        self
    }

    pub fn register_evaluator<F>(&self, keyword: impl Into<String>, evaluator: F) -> &Self
    where
        F: Fn(&NaiveDateTime) -> bool + Send + Sync + 'static,
    {
        let keyword = keyword.into();
        let evaluator: Evaluator = Arc::new(evaluator);

        if let Ok(mut evaluators) = self.evaluators.write() {
            evaluators.insert(keyword.clone(), evaluator.clone());
        }
        self.register(Arc::new(CustomCondition { keyword, evaluator }))
    }

    pub fn has(&self, keyword: &str) -> bool {
        self.condition(keyword).is_some()
            || self
                .evaluators
                .read()
                .is_ok_and(|evaluators| evaluators.contains_key(keyword))
    }

    pub fn condition(&self, keyword: &str) -> Option<Arc<dyn Condition>> {
        self.conditions.read().ok()?.get(keyword).cloned()
    }

    /// Unknown keywords evaluate to false. `at` defaults to the clock.
    pub fn evaluate(&self, keyword: &str, at: Option<&NaiveDateTime>) -> bool {
        let at = at.copied().unwrap_or_else(|| self.clock.now());
        self.condition(keyword)
            .is_some_and(|condition| condition.evaluate(&at))
    }

    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = self
            .conditions
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        keywords.sort();
        keywords
    }

    pub fn custom_keywords(&self) -> Vec<String> {
        self.evaluators
            .read()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn remove(&self, keyword: &str) -> &Self {
        if let Ok(mut conditions) = self.conditions.write() {
            conditions.remove(keyword);
        }
        if let Ok(mut evaluators) = self.evaluators.write() {
            evaluators.shift_remove(keyword);
        }
        self
    }

    /// Drop every custom evaluator, keeping the built-ins.
    pub fn clear_custom(&self) -> &Self {
        for keyword in self.custom_keywords() {
            self.remove(&keyword);
        }
        self
    }

    /// A [`TemporalExpression`] carrying every custom evaluator.
    pub fn create_expression(&self, expression: &str) -> TemporalExpression {
        let mut temporal = TemporalExpression::new(expression);
        if let Ok(evaluators) = self.evaluators.read() {
            for (keyword, evaluator) in evaluators.iter() {
                temporal.register_shared(keyword.clone(), evaluator.clone());
            }
        }
        temporal
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        ConditionRegistry::new()
    }
}

impl fmt::Debug for ConditionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionRegistry")
            .field("keywords", &self.keywords())
            .field("clock", &self.clock)
            .finish()
    }
}
