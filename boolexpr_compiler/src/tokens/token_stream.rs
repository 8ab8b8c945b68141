//! Cursor over a lexed token sequence
//!
//! The lexer always terminates the sequence with [`Token::Eof`], so the
//! cursor never runs off the end: advancing past `Eof` stays on `Eof`.

use crate::tokens::token::Token;
use crate::utils::{Position, Span, Spanned};
use serde::Serialize;

pub type SpannedToken = Spanned<Token>;

#[derive(Debug, Clone, Serialize)]
pub struct TokenStream {
    tokens: Vec<SpannedToken>,
    #[serde(skip)]
    position: usize,
}

impl TokenStream {
    /// Wrap lexer output, appending `Eof` if it is missing
    pub fn new(mut tokens: Vec<SpannedToken>) -> Self {
        if !tokens.last().is_some_and(|t| t.value.is_eof()) {
            let end = tokens
                .last()
                .map(|t| t.span.end)
                .unwrap_or_else(Position::start);
            tokens.push(Spanned::new(Token::Eof, Span::point(end)));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    pub fn current(&self) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    pub fn current_token(&self) -> &Token {
        &self.current().value
    }

    pub fn current_span(&self) -> Span {
        self.current().span
    }

    pub fn peek(&self) -> &SpannedToken {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + 1).min(last)]
    }

    /// Move to the next token and return the one just consumed
    pub fn advance(&mut self) -> SpannedToken {
        let consumed = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        consumed
    }

    pub fn is_at_end(&self) -> bool {
        self.current_token().is_eof()
    }

    /// Number of tokens excluding `Eof`
    pub fn len(&self) -> usize {
        self.tokens.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn tokens(&self) -> &[SpannedToken] {
        &self.tokens
    }

    /// Count of each token kind, for diagnostics
    pub fn kind_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts: Vec<(&'static str, usize)> = Vec::new();
        for token in &self.tokens[..self.len()] {
            let kind = token.value.kind();
            match counts.iter_mut().find(|(k, _)| *k == kind) {
                Some((_, n)) => *n += 1,
                None => counts.push((kind, 1)),
            }
        }
        counts
    }
}
