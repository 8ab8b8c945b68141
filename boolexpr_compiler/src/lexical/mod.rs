//! Lexical analysis: normalized text to tokens

pub mod analyzer;

pub use analyzer::{LexError, LexicalAnalyzer, LexicalMetrics};

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::tokens::TokenStream;

/// Tokenize with preferences from the environment
pub fn tokenize(source: &str) -> Result<TokenStream, LexError> {
    LexicalAnalyzer::new().tokenize(source)
}

pub fn tokenize_with_preferences(
    source: &str,
    preferences: LexicalPreferences,
) -> Result<TokenStream, LexError> {
    LexicalAnalyzer::with_preferences(preferences).tokenize(source)
}

/// Compile-time lexical limits in effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityLimits {
    pub max_expression_length: usize,
    pub max_identifier_length: usize,
    pub max_token_count: usize,
}

pub fn get_security_limits() -> SecurityLimits {
    SecurityLimits {
        max_expression_length: MAX_EXPRESSION_LENGTH,
        max_identifier_length: MAX_IDENTIFIER_LENGTH,
        max_token_count: MAX_TOKEN_COUNT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_expression_length_limit() {
        let source = "a ".repeat(MAX_EXPRESSION_LENGTH / 2 + 1);
        assert_matches!(tokenize(&source), Err(LexError::ExpressionTooLong { .. }));
    }

    #[test]
    fn test_security_limits_match_constants() {
        let limits = get_security_limits();
        assert_eq!(limits.max_token_count, MAX_TOKEN_COUNT);
        assert!(limits.max_identifier_length <= limits.max_expression_length);
    }
}
