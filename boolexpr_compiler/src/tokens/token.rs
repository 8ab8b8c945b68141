use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    Identifier(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
    BooleanLiteral(bool),
    /// `&`, `&&`, `|` or `||`; lexed so the parser can reject them with a
    /// grammar error instead of a character error
    ReservedOperator(String),
    Eof,
}

impl Token {
    /// Can this token start an operand?
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_) | Token::Not | Token::LParen | Token::BooleanLiteral(_)
        )
    }

    pub fn is_binary_connective(&self) -> bool {
        matches!(self, Token::And | Token::Or)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    /// Short kind name used in token dumps
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Identifier(_) => "IDENTIFIER",
            Token::And => "AND",
            Token::Or => "OR",
            Token::Not => "NOT",
            Token::LParen => "LPAREN",
            Token::RParen => "RPAREN",
            Token::BooleanLiteral(_) => "BOOLEAN_LITERAL",
            Token::ReservedOperator(_) => "RESERVED_OPERATOR",
            Token::Eof => "EOF",
        }
    }
}

/// Human-readable form used in "found ..." error messages
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "identifier '{}'", name),
            Token::And => write!(f, "AND"),
            Token::Or => write!(f, "OR"),
            Token::Not => write!(f, "NOT"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::BooleanLiteral(value) => write!(f, "literal {}", value),
            Token::ReservedOperator(op) => write!(f, "'{}'", op),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_starters() {
        assert!(Token::Identifier("x".into()).starts_operand());
        assert!(Token::Not.starts_operand());
        assert!(Token::BooleanLiteral(true).starts_operand());
        assert!(!Token::And.starts_operand());
        assert!(!Token::ReservedOperator("&".into()).starts_operand());
    }

    #[test]
    fn test_display_for_messages() {
        assert_eq!(Token::ReservedOperator("&&".into()).to_string(), "'&&'");
        assert_eq!(Token::Eof.to_string(), "end of input");
        assert_eq!(Token::Identifier("y".into()).to_string(), "identifier 'y'");
    }
}
