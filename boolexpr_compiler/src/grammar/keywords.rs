//! Reserved words of the expression language
//!
//! Keywords are matched case-insensitively against whole words only. A word
//! that merely contains a keyword (`orange`, `android`, `nothing`) is an
//! ordinary identifier.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    And,
    Or,
    Not,
    True,
    False,
}

impl Keyword {
    pub const ALL: [Keyword; 5] = [
        Keyword::And,
        Keyword::Or,
        Keyword::Not,
        Keyword::True,
        Keyword::False,
    ];

    /// Spelling emitted by the normalizer
    pub fn canonical(&self) -> &'static str {
        match self {
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }

    /// Classify a whole word, ignoring ASCII case
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.canonical().eq_ignore_ascii_case(word))
    }

    pub fn is_connective(&self) -> bool {
        matches!(self, Keyword::And | Keyword::Or | Keyword::Not)
    }
}

pub fn is_reserved_keyword(word: &str) -> bool {
    Keyword::from_word(word).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_classification() {
        assert_eq!(Keyword::from_word("or"), Some(Keyword::Or));
        assert_eq!(Keyword::from_word("Or"), Some(Keyword::Or));
        assert_eq!(Keyword::from_word("aNd"), Some(Keyword::And));
        assert_eq!(Keyword::from_word("TRUE"), Some(Keyword::True));
        assert_eq!(Keyword::from_word("orange"), None);
        assert_eq!(Keyword::from_word("android"), None);
        assert_eq!(Keyword::from_word("nothing"), None);
    }

    #[test]
    fn test_connectives() {
        assert!(Keyword::Not.is_connective());
        assert!(!Keyword::False.is_connective());
        assert!(is_reserved_keyword("not"));
        assert!(!is_reserved_keyword("knot"));
    }
}
