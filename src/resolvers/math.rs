use crate::{
    context::Context,
    error::Result,
    math::MathEvaluator,
    resolver::Resolver,
    token::{Token, TokenType},
    value::Value,
};

/// `2 + 3 * 4`: evaluated by the bounded arithmetic evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathResolver {
    evaluator: MathEvaluator,
}

impl MathResolver {
    pub fn new() -> Self {
        MathResolver::default()
    }
}

impl Resolver for MathResolver {
    fn name(&self) -> &str {
        "math"
    }

    fn priority(&self) -> i32 {
        70
    }

    fn supported_types(&self) -> &[TokenType] {
        &[TokenType::Math]
    }

    fn resolve(&self, token: &Token, _context: &Context) -> Result<Value> {
        let expression = token.meta("expression").unwrap_or(token.raw());
        Ok(self.evaluator.evaluate(expression)?)
    }
}
