//! Safe arithmetic over `+ - * /` and parentheses.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := ('-' | '+') factor | '(' expr ')' | number
//! ```
//!
//! Integers stay integers under `+ - *`; any float operand promotes the
//! result. Division yields an integer only when it is exact.

use crate::{
    error::{MathError, MathErrorReason},
    value::Value,
};

pub const MAX_LENGTH: usize = 500;
pub const MAX_DEPTH: usize = 10;

/// Evaluates arithmetic expressions without any host `eval`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathEvaluator;

impl MathEvaluator {
    pub fn new() -> Self {
        MathEvaluator
    }

    /// Evaluate to [`Value::Integer`] or [`Value::Float`].
    pub fn evaluate(&self, expression: &str) -> Result<Value, MathError> {
        let rejected: String = expression.chars().filter(|&c| !is_allowed(c)).collect();
        if !rejected.is_empty() {
            return Err(MathError::new(
                expression,
                MathErrorReason::InvalidOperator(rejected),
            ));
        }

        let expression = expression.trim();
        if expression.len() > MAX_LENGTH {
            return Err(MathError::new(expression, MathErrorReason::TooLong(MAX_LENGTH)));
        }
        if expression.is_empty() {
            return Ok(Value::Integer(0));
        }

        let mut parser = MathParser::new(expression);
        let result = parser.parse_expression()?;

        parser.skip_whitespace();
        if let Some(ch) = parser.current_char() {
            return Err(parser.error(MathErrorReason::InvalidOperator(ch.to_string())));
        }

        Ok(result.into())
    }

    /// Whether `value` contains any arithmetic operator or parenthesis.
    pub fn has_expression(&self, value: &str) -> bool {
        value.chars().any(|c| matches!(c, '+' | '-' | '*' | '/' | '(' | ')'))
    }
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_whitespace() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.')
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(n) => n,
        }
    }

    fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    fn neg(self) -> Number {
        match self {
            Number::Int(n) => n.checked_neg().map(Number::Int).unwrap_or(Number::Float(-(n as f64))),
            Number::Float(n) => Number::Float(-n),
        }
    }

    /// Integer op with overflow falling back to float, as scripting hosts do.
    fn combine(
        self,
        other: Number,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => int_op(a, b)
                .map(Number::Int)
                .unwrap_or_else(|| Number::Float(float_op(a as f64, b as f64))),
            (a, b) => Number::Float(float_op(a.as_f64(), b.as_f64())),
        }
    }

    fn divide(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) if a.checked_rem(b) == Some(0) => a
                .checked_div(b)
                .map(Number::Int)
                .unwrap_or(Number::Float(a as f64 / b as f64)),
            (a, b) => Number::Float(a.as_f64() / b.as_f64()),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Int(i) => Value::Integer(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

struct MathParser<'a> {
    source: &'a str,
    input: Vec<char>,
    position: usize,
    depth: usize,
}

impl<'a> MathParser<'a> {
    fn new(source: &'a str) -> Self {
        MathParser {
            source,
            input: source.chars().collect(),
            position: 0,
            depth: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn error(&self, reason: MathErrorReason) -> MathError {
        MathError::new(self.source, reason)
    }

    fn parse_expression(&mut self) -> Result<Number, MathError> {
        let mut left = self.parse_term()?;

        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some('+') => {
                    self.advance();
                    let right = self.parse_term()?;
                    left = left.combine(right, i64::checked_add, |a, b| a + b);
                }
                Some('-') => {
                    self.advance();
                    let right = self.parse_term()?;
                    left = left.combine(right, i64::checked_sub, |a, b| a - b);
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Number, MathError> {
        let mut left = self.parse_factor()?;

        loop {
            self.skip_whitespace();
            match self.current_char() {
                Some('*') => {
                    self.advance();
                    let right = self.parse_factor()?;
                    left = left.combine(right, i64::checked_mul, |a, b| a * b);
                }
                Some('/') => {
                    self.advance();
                    let divisor = self.parse_factor()?;
                    if divisor.is_zero() {
                        return Err(self.error(MathErrorReason::DivisionByZero));
                    }
                    left = left.divide(divisor);
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Number, MathError> {
        self.skip_whitespace();

        match self.current_char() {
            Some('-') => {
                self.advance();
                Ok(self.parse_factor()?.neg())
            }
            Some('+') => {
                self.advance();
                self.parse_factor()
            }
            Some('(') => {
                self.depth += 1;
                if self.depth > MAX_DEPTH {
                    return Err(self.error(MathErrorReason::TooDeep(MAX_DEPTH)));
                }
                self.advance();

                let result = self.parse_expression()?;
                self.skip_whitespace();
                if self.current_char() != Some(')') {
                    return Err(self.error(MathErrorReason::InvalidOperator(
                        "missing closing parenthesis".to_string(),
                    )));
                }
                self.advance();
                self.depth -= 1;
                Ok(result)
            }
            _ => self.parse_number(),
        }
    }

    fn parse_number(&mut self) -> Result<Number, MathError> {
        self.skip_whitespace();

        let start = self.position;
        let mut has_decimal = false;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_decimal {
                has_decimal = true;
                self.advance();
            } else {
                break;
            }
        }

        if start == self.position {
            return Err(self.error(MathErrorReason::InvalidOperator(format!(
                "expected number at position {}",
                self.position
            ))));
        }

        let literal: String = self.input[start..self.position].iter().collect();
        let number = if has_decimal {
            Number::Float(literal.parse().unwrap_or(0.0))
        } else {
            literal
                .parse()
                .map(Number::Int)
                .unwrap_or_else(|_| Number::Float(literal.parse().unwrap_or(0.0)))
        };
        Ok(number)
    }
}
