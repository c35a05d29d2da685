use once_cell::sync::Lazy;
use regex::Regex;

use super::{BUILTIN_KEYWORDS, ast::Node};
use crate::error::SyntaxError;

static TIME_RANGE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])-([01]?[0-9]|2[0-3]):([0-5][0-9])")
        .expect("time range prefix pattern")
});
static TIME_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])-([01]?[0-9]|2[0-3]):([0-5][0-9])$")
        .expect("time range pattern")
});
static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*").expect("identifier pattern"));

/// Deepest allowed nesting of `(` and `!`.
pub const MAX_NESTING: usize = 32;

#[derive(Debug, Clone, PartialEq)]
enum Lexeme {
    And,
    Or,
    Not,
    LParen,
    RParen,
    Condition(String),
}

impl Lexeme {
    fn text(&self) -> &str {
        match self {
            Lexeme::And => "&&",
            Lexeme::Or => "||",
            Lexeme::Not => "!",
            Lexeme::LParen => "(",
            Lexeme::RParen => ")",
            Lexeme::Condition(value) => value,
        }
    }
}

/// Turns temporal expression text into a [`Node`] tree.
pub struct ExpressionParser {
    source: String,
    input: Vec<char>,
    position: usize,
    /// Each lexeme with its character offset in `source`.
    lexemes: Vec<(Lexeme, usize)>,
    current: usize,
    depth: usize,
}

impl ExpressionParser {
    pub fn new(expression: &str) -> Self {
        let source = expression.trim().to_string();
        ExpressionParser {
            input: source.chars().collect(),
            source,
            position: 0,
            lexemes: Vec::new(),
            current: 0,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Node, SyntaxError> {
        if self.source.is_empty() {
            return Ok(Node::Literal(true));
        }

        self.tokenize()?;
        let node = self.parse_or()?;

        if let Some(lexeme) = self.peek() {
            return Err(SyntaxError::UnexpectedToken {
                token: lexeme.text().to_string(),
                position: self.offset(),
            });
        }

        Ok(node)
    }

    /// Distinct condition texts in order of first appearance.
    pub fn extract_keywords(mut self) -> Result<Vec<String>, SyntaxError> {
        self.tokenize()?;

        let mut keywords: Vec<String> = Vec::new();
        for (lexeme, _) in &self.lexemes {
            if let Lexeme::Condition(value) = lexeme
                && !keywords.contains(value)
            {
                keywords.push(value.clone());
            }
        }
        Ok(keywords)
    }

    // ===== Tokenizer =====

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn rest(&self) -> String {
        self.input[self.position..].iter().collect()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(i, c)| self.input.get(self.position + i) == Some(&c))
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn at_operator(&self) -> bool {
        self.starts_with("&&") || self.starts_with("||")
    }

    fn push(&mut self, lexeme: Lexeme, start: usize) {
        self.lexemes.push((lexeme, start));
    }

    fn tokenize(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.skip_whitespace();
            let Some(ch) = self.current_char() else {
                return Ok(());
            };
            let start = self.position;

            if self.starts_with("&&") {
                self.push(Lexeme::And, start);
                self.position += 2;
            } else if self.starts_with("||") {
                self.push(Lexeme::Or, start);
                self.position += 2;
            } else if ch == '!' {
                self.push(Lexeme::Not, start);
                self.position += 1;
            } else if ch == '(' {
                self.push(Lexeme::LParen, start);
                self.position += 1;
            } else if ch == ')' {
                self.push(Lexeme::RParen, start);
                self.position += 1;
            } else if self.starts_with("cron:") {
                self.position += "cron:".len();
                let spec = self.read_while(|p, c| c != '(' && c != ')' && !p.at_operator());
                self.push(Lexeme::Condition(format!("cron:{}", spec.trim())), start);
            } else if self.starts_with("nth:") || self.starts_with("last:") {
                let condition = self.read_while(|p, c| {
                    !c.is_whitespace() && c != '(' && c != ')' && !p.at_operator()
                });
                self.push(Lexeme::Condition(condition), start);
            } else if let Some(found) = TIME_RANGE_PREFIX.find(&self.rest()) {
                let range = found.as_str().to_string();
                self.position += range.chars().count();
                self.push(Lexeme::Condition(range), start);
            } else if let Some(found) = IDENTIFIER.find(&self.rest()) {
                let name = found.as_str().to_string();
                self.position += name.chars().count();
                self.push(Lexeme::Condition(name), start);
            } else {
                return Err(SyntaxError::UnexpectedCharacter {
                    expression: self.source.clone(),
                    found: ch.to_string(),
                    position: self.position,
                });
            }
        }
    }

    fn read_while(&mut self, keep: impl Fn(&Self, char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if !keep(self, ch) {
                break;
            }
            result.push(ch);
            self.position += 1;
        }
        result
    }

    // ===== Parser =====

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.current).map(|(lexeme, _)| lexeme)
    }

    /// Character offset of the current lexeme, or the end of input.
    fn offset(&self) -> usize {
        self.lexemes
            .get(self.current)
            .map_or(self.input.len(), |(_, start)| *start)
    }

    fn descend(&mut self) -> Result<(), SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(SyntaxError::NestingTooDeep {
                position: self.offset(),
                max_depth: MAX_NESTING,
            });
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Node, SyntaxError> {
        let mut operands = vec![self.parse_and()?];
        while self.peek() == Some(&Lexeme::Or) {
            self.current += 1;
            operands.push(self.parse_and()?);
        }
        Ok(Node::or(operands))
    }

    fn parse_and(&mut self) -> Result<Node, SyntaxError> {
        let mut operands = vec![self.parse_not()?];
        while self.peek() == Some(&Lexeme::And) {
            self.current += 1;
            operands.push(self.parse_not()?);
        }
        Ok(Node::and(operands))
    }

    fn parse_not(&mut self) -> Result<Node, SyntaxError> {
        if self.peek() == Some(&Lexeme::Not) {
            self.descend()?;
            self.current += 1;
            let node = Node::not(self.parse_not()?);
            self.depth -= 1;
            return Ok(node);
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Node, SyntaxError> {
        match self.peek().cloned() {
            Some(Lexeme::LParen) => {
                self.descend()?;
                self.current += 1;
                let node = self.parse_or()?;
                if self.peek() != Some(&Lexeme::RParen) {
                    return Err(SyntaxError::MissingClosingParen);
                }
                self.current += 1;
                self.depth -= 1;
                Ok(node)
            }
            Some(Lexeme::Condition(value)) => {
                self.current += 1;
                parse_condition(&value)
            }
            other => Err(SyntaxError::ExpectedCondition {
                found: other
                    .map(|l| l.text().to_string())
                    .unwrap_or_else(|| "end of expression".to_string()),
                position: self.offset(),
            }),
        }
    }
}

fn parse_condition(value: &str) -> Result<Node, SyntaxError> {
    if let Some(spec) = value.strip_prefix("cron:") {
        return Ok(Node::Cron(spec.trim().to_string()));
    }

    if value.starts_with("nth:") {
        let parts: Vec<&str> = value.split(':').collect();
        if parts.len() != 3 {
            return Err(SyntaxError::InvalidNthFormat {
                condition: value.to_string(),
            });
        }
        return Ok(Node::NthWeekday {
            day: parts[1].to_string(),
            occurrences: parts[2].split(',').map(leading_int).collect(),
        });
    }

    if let Some(day) = value.strip_prefix("last:") {
        return Ok(Node::LastWeekday(day.to_string()));
    }

    if TIME_RANGE.is_match(value) {
        return Ok(Node::TimeRange(value.to_string()));
    }

    if BUILTIN_KEYWORDS.contains(&value) {
        return Ok(Node::Keyword(value.to_string()));
    }

    Ok(Node::Custom(value.to_string()))
}

/// Leading integer of `s`, or 0 when there is none.
fn leading_int(s: &str) -> i64 {
    let s = s.trim();
    let sign_len = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + sign_len);
    s[..digits].parse().unwrap_or(0)
}
