use super::{Token, TokenType};

/// An ordered list of parsed tokens with filtering helpers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenCollection {
    tokens: Vec<Token>,
}

impl TokenCollection {
    pub fn new(tokens: Vec<Token>) -> Self {
        TokenCollection { tokens }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn of_type(&self, token_type: TokenType) -> Self {
        self.filtered(|t| t.token_type() == token_type)
    }

    pub fn of_types(&self, types: &[TokenType]) -> Self {
        self.filtered(|t| types.contains(&t.token_type()))
    }

    pub fn requiring_accessor(&self) -> Self {
        self.filtered(|t| t.token_type().requires_accessor())
    }

    /// Distinct non-empty prefixes in first-seen order.
    pub fn unique_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = Vec::new();
        for token in &self.tokens {
            let prefix = token.prefix();
            if !prefix.is_empty() && !prefixes.iter().any(|p| p == prefix) {
                prefixes.push(prefix.to_string());
            }
        }
        prefixes
    }

    pub fn has_dynamic(&self) -> bool {
        self.tokens.iter().any(Token::is_dynamic)
    }

    pub fn raw_strings(&self) -> Vec<&str> {
        self.tokens.iter().map(Token::raw).collect()
    }

    pub fn full_strings(&self) -> Vec<String> {
        self.tokens.iter().map(Token::full).collect()
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn into_vec(self) -> Vec<Token> {
        self.tokens
    }

    fn filtered(&self, keep: impl Fn(&Token) -> bool) -> Self {
        TokenCollection {
            tokens: self.tokens.iter().filter(|t| keep(t)).cloned().collect(),
        }
    }
}

impl From<Vec<Token>> for TokenCollection {
    fn from(tokens: Vec<Token>) -> Self {
        TokenCollection::new(tokens)
    }
}

impl IntoIterator for TokenCollection {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenCollection {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
