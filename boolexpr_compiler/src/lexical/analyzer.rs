//! Lexical analyzer for normalized expression text
//!
//! Whitespace is skipped. Every error reports the byte offset of the
//! offending character together with its line and column.

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::grammar::Keyword;
use crate::logging::codes;
use crate::tokens::{Token, TokenStream};
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error};
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Invalid character '{character}' at offset {offset} (line {line}, column {column})")]
    InvalidCharacter {
        character: char,
        offset: usize,
        line: u32,
        column: u32,
    },

    #[error("Invalid identifier '{text}' at offset {offset}: identifiers must not start with a digit")]
    InvalidIdentifier { text: String, offset: usize },

    #[error("Identifier too long at offset {offset}: {length} bytes (max {MAX_IDENTIFIER_LENGTH})")]
    IdentifierTooLong { length: usize, offset: usize },

    #[error("Expression too long: {length} bytes (max {MAX_EXPRESSION_LENGTH})")]
    ExpressionTooLong { length: usize },

    #[error("Too many tokens: more than {MAX_TOKEN_COUNT} at offset {offset}")]
    TooManyTokens { offset: usize },
}

impl LexError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexError::InvalidCharacter { .. } | LexError::InvalidIdentifier { .. } => {
                codes::lexical::INVALID_CHARACTER
            }
            LexError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            LexError::ExpressionTooLong { .. } => codes::lexical::EXPRESSION_TOO_LONG,
            LexError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    /// Byte offset of the failure
    pub fn offset(&self) -> usize {
        match self {
            LexError::InvalidCharacter { offset, .. }
            | LexError::InvalidIdentifier { offset, .. }
            | LexError::IdentifierTooLong { offset, .. }
            | LexError::TooManyTokens { offset } => *offset,
            LexError::ExpressionTooLong { .. } => MAX_EXPRESSION_LENGTH,
        }
    }
}

/// Token tallies for the most recent run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub total_tokens: usize,
    pub identifier_tokens: usize,
    pub connective_tokens: usize,
    pub literal_tokens: usize,
    pub paren_tokens: usize,
    pub max_identifier_length: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token) {
        self.total_tokens += 1;
        match token {
            Token::Identifier(name) => {
                self.identifier_tokens += 1;
                self.max_identifier_length = self.max_identifier_length.max(name.len());
            }
            Token::And | Token::Or | Token::Not => self.connective_tokens += 1,
            Token::BooleanLiteral(_) => self.literal_tokens += 1,
            Token::LParen | Token::RParen => self.paren_tokens += 1,
            Token::ReservedOperator(_) | Token::Eof => {}
        }
    }
}

pub struct LexicalAnalyzer {
    metrics: LexicalMetrics,
    preferences: LexicalPreferences,
}

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            metrics: LexicalMetrics::default(),
            preferences,
        }
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    pub fn tokenize(&mut self, source: &str) -> Result<TokenStream, LexError> {
        self.metrics = LexicalMetrics::default();

        if source.len() > MAX_EXPRESSION_LENGTH {
            let error = LexError::ExpressionTooLong {
                length: source.len(),
            };
            log_error!(error.error_code(), "Expression exceeds length limit",
                "length" => source.len(),
                "limit" => MAX_EXPRESSION_LENGTH
            );
            return Err(error);
        }

        let mut tokens: Vec<Spanned<Token>> = Vec::new();
        let mut chars = source.char_indices().peekable();
        let mut pos = Position::start();

        while let Some(&(offset, ch)) = chars.peek() {
            debug_assert_eq!(offset, pos.offset);

            if ch.is_whitespace() {
                chars.next();
                pos = pos.advance(ch);
                continue;
            }

            if tokens.len() >= MAX_TOKEN_COUNT {
                let error = LexError::TooManyTokens { offset };
                log_error!(error.error_code(), "Token limit exceeded",
                    span = Span::point(pos),
                    "limit" => MAX_TOKEN_COUNT
                );
                return Err(error);
            }

            let token = match self.next_token(source, &mut chars, pos) {
                Ok(token) => token,
                Err(error) => {
                    let span = Span::new(pos, pos.advance(ch));
                    if self.preferences.include_position_in_errors {
                        log_error!(error.error_code(), &error.to_string(), span = span);
                    } else {
                        log_error!(error.error_code(), &error.to_string());
                    }
                    return Err(error);
                }
            };

            pos = token.span.end;
            self.metrics.record_token(&token.value);
            tokens.push(token);
        }

        tokens.push(Spanned::new(Token::Eof, Span::point(pos)));

        log_debug!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
            "tokens" => self.metrics.total_tokens,
            "identifiers" => self.metrics.identifier_tokens,
            "connectives" => self.metrics.connective_tokens
        );

        Ok(TokenStream::new(tokens))
    }

    /// Lex one token starting at `start`; the first char has not been consumed
    fn next_token(
        &self,
        source: &str,
        chars: &mut Peekable<CharIndices<'_>>,
        start: Position,
    ) -> Result<Spanned<Token>, LexError> {
        let Some((offset, ch)) = chars.next() else {
            return Ok(Spanned::new(Token::Eof, Span::point(start)));
        };

        let single = |token: Token| Spanned::new(token, Span::new(start, start.advance(ch)));

        match ch {
            '(' => Ok(single(Token::LParen)),
            ')' => Ok(single(Token::RParen)),
            '!' if self.preferences.accept_bang_negation => Ok(single(Token::Not)),
            '&' | '|' => {
                let mut text = ch.to_string();
                if chars.next_if(|&(_, next)| next == ch).is_some() {
                    text.push(ch);
                }
                let end = start.advance_str(&text);
                Ok(Spanned::new(Token::ReservedOperator(text), Span::new(start, end)))
            }
            c if c.is_alphabetic() || c == '_' => {
                let word = take_word(source, offset, chars);
                self.classify_word(word, start)
            }
            c if c.is_ascii_digit() => {
                let word = take_word(source, offset, chars);
                Err(LexError::InvalidIdentifier {
                    text: word.to_string(),
                    offset,
                })
            }
            _ => Err(LexError::InvalidCharacter {
                character: ch,
                offset,
                line: start.line,
                column: start.column,
            }),
        }
    }

    fn classify_word(&self, word: &str, start: Position) -> Result<Spanned<Token>, LexError> {
        if word.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexError::IdentifierTooLong {
                length: word.len(),
                offset: start.offset,
            });
        }

        let token = match Keyword::from_word(word) {
            Some(Keyword::And) => Token::And,
            Some(Keyword::Or) => Token::Or,
            Some(Keyword::Not) => Token::Not,
            Some(Keyword::True) => Token::BooleanLiteral(true),
            Some(Keyword::False) => Token::BooleanLiteral(false),
            None => Token::Identifier(word.to_string()),
        };
        Ok(Spanned::new(token, Span::new(start, start.advance_str(word))))
    }
}

impl Default for LexicalAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume the rest of a word whose first char (at `start`) is already taken
fn take_word<'a>(source: &'a str, start: usize, chars: &mut Peekable<CharIndices<'_>>) -> &'a str {
    let mut end = source.len();
    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_alphanumeric() || ch == '_' {
            chars.next();
        } else {
            end = offset;
            break;
        }
    }
    &source[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(source: &str) -> Vec<Token> {
        LexicalAnalyzer::with_preferences(crate::config::RuntimeConfig::strict().lexical)
            .tokenize(source)
            .unwrap()
            .tokens()
            .iter()
            .map(|t| t.value.clone())
            .collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            kinds("(a AND NOT b) OR true"),
            vec![
                Token::LParen,
                Token::Identifier("a".into()),
                Token::And,
                Token::Not,
                Token::Identifier("b".into()),
                Token::RParen,
                Token::Or,
                Token::BooleanLiteral(true),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_inside_identifiers() {
        assert_eq!(
            kinds("orange AND band_or"),
            vec![
                Token::Identifier("orange".into()),
                Token::And,
                Token::Identifier("band_or".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_bang_and_reserved_operators() {
        assert_eq!(
            kinds("!a&&b|c"),
            vec![
                Token::Not,
                Token::Identifier("a".into()),
                Token::ReservedOperator("&&".into()),
                Token::Identifier("b".into()),
                Token::ReservedOperator("|".into()),
                Token::Identifier("c".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_bang_can_be_disabled() {
        let mut preferences = crate::config::RuntimeConfig::strict().lexical;
        preferences.accept_bang_negation = false;
        let result = LexicalAnalyzer::with_preferences(preferences).tokenize("!a");
        assert_matches!(result, Err(LexError::InvalidCharacter { character: '!', offset: 0, .. }));
    }

    #[test]
    fn test_invalid_character_reports_offset() {
        let result = LexicalAnalyzer::new().tokenize("a OR\n  $b");
        assert_matches!(
            result,
            Err(LexError::InvalidCharacter { character: '$', offset: 7, line: 2, column: 3 })
        );
    }

    #[test]
    fn test_identifier_cannot_start_with_digit() {
        let result = LexicalAnalyzer::new().tokenize("x AND 1abc");
        assert_matches!(result, Err(LexError::InvalidIdentifier { ref text, offset: 6 }) if text == "1abc");
    }

    #[test]
    fn test_identifier_length_limit() {
        let long = "v".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = LexicalAnalyzer::new().tokenize(&long);
        assert_matches!(result, Err(LexError::IdentifierTooLong { offset: 0, .. }));
    }

    #[test]
    fn test_spans_cover_source_text() {
        let source = "alpha  OR\tbeta";
        let stream = LexicalAnalyzer::new().tokenize(source).unwrap();
        let slices: Vec<&str> = stream.tokens().iter().map(|t| t.span.slice(source)).collect();
        assert_eq!(slices, vec!["alpha", "OR", "beta", ""]);
    }

    #[test]
    fn test_metrics() {
        let mut analyzer = LexicalAnalyzer::new();
        analyzer.tokenize("(long_name OR b) AND false").unwrap();
        let metrics = analyzer.metrics();
        assert_eq!(metrics.total_tokens, 7);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.connective_tokens, 2);
        assert_eq!(metrics.literal_tokens, 1);
        assert_eq!(metrics.paren_tokens, 2);
        assert_eq!(metrics.max_identifier_length, 9);
    }

    #[test]
    fn test_whitespace_only_yields_eof() {
        assert_eq!(kinds("  \t\n "), vec![Token::Eof]);
    }
}
