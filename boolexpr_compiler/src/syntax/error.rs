//! Parse errors
//!
//! Every variant can be read as the triple `{position, expected, found}`,
//! where `position` is the byte offset of the token that failed.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::{codes, Code};
use crate::utils::Span;

pub type ParseResult<T> = Result<T, ParseError>;

pub(crate) const EXPECTED_OPERAND: &str = "identifier, literal, NOT or '('";
const EXPECTED_CONTINUATION: &str = "AND, OR or end of input";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unexpected token at offset {}: expected {expected}, found {found}", .span.start.offset)]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unmatched '{paren}' at offset {}", .span.start.offset)]
    UnmatchedParenthesis {
        /// The parenthesis that has no partner
        paren: char,
        span: Span,
        found: String,
    },

    #[error("Unexpected {found} at offset {} after a complete expression", .span.start.offset)]
    TrailingInput { found: String, span: Span },

    #[error("Empty expression")]
    EmptyExpression { span: Span },

    #[error("Expression nested deeper than {MAX_PARSE_DEPTH} levels at offset {}", .span.start.offset)]
    MaxDepthExceeded { span: Span },
}

impl ParseError {
    pub fn unexpected_token(expected: &str, found: impl ToString, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.to_string(),
            span,
        }
    }

    pub fn unclosed_paren(open_span: Span, found: impl ToString) -> Self {
        Self::UnmatchedParenthesis {
            paren: '(',
            span: open_span,
            found: found.to_string(),
        }
    }

    pub fn unopened_paren(close_span: Span) -> Self {
        Self::UnmatchedParenthesis {
            paren: ')',
            span: close_span,
            found: "')'".to_string(),
        }
    }

    pub fn trailing_input(found: impl ToString, span: Span) -> Self {
        Self::TrailingInput {
            found: found.to_string(),
            span,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::UnmatchedParenthesis { .. } => codes::syntax::UNMATCHED_PARENTHESIS,
            Self::TrailingInput { .. } => codes::syntax::TRAILING_INPUT,
            Self::EmptyExpression { .. } => codes::syntax::EMPTY_EXPRESSION,
            Self::MaxDepthExceeded { .. } => codes::syntax::MAX_PARSE_DEPTH,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnmatchedParenthesis { span, .. }
            | Self::TrailingInput { span, .. }
            | Self::EmptyExpression { span }
            | Self::MaxDepthExceeded { span } => *span,
        }
    }

    /// Byte offset of the failing token
    pub fn position(&self) -> usize {
        self.span().start.offset
    }

    pub fn expected(&self) -> &str {
        match self {
            Self::UnexpectedToken { expected, .. } => expected,
            Self::UnmatchedParenthesis { paren: '(', .. } => "')'",
            Self::UnmatchedParenthesis { .. } => EXPECTED_CONTINUATION,
            Self::TrailingInput { .. } => EXPECTED_CONTINUATION,
            Self::EmptyExpression { .. } => EXPECTED_OPERAND,
            Self::MaxDepthExceeded { .. } => "less deeply nested expression",
        }
    }

    pub fn found(&self) -> &str {
        match self {
            Self::UnexpectedToken { found, .. }
            | Self::UnmatchedParenthesis { found, .. }
            | Self::TrailingInput { found, .. } => found,
            Self::EmptyExpression { .. } => "end of input",
            Self::MaxDepthExceeded { .. } => "nesting limit",
        }
    }
}
