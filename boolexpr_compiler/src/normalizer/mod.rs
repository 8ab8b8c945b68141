//! Keyword normalization
//!
//! Rewrites every whole-word keyword (`and`, `Or`, `NOT`, `True`, ...) to its
//! canonical spelling before lexing. Words are maximal runs of alphanumeric
//! characters and underscores, so `orange` or `band` are never touched.
//!
//! Canonical spellings have the same byte length as the words they replace,
//! so every byte offset in the normalized text is also an offset into the
//! caller's original text.

use crate::grammar::Keyword;
use crate::logging::codes;

/// Normalized text and how many words were rewritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedExpression {
    text: String,
    rewrites: usize,
}

impl NormalizedExpression {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn rewrites(&self) -> usize {
        self.rewrites
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn normalize(raw: &str) -> NormalizedExpression {
    let mut text = String::with_capacity(raw.len());
    let mut rewrites = 0;
    let mut word_start: Option<usize> = None;

    for (offset, ch) in raw.char_indices() {
        match (is_word_char(ch), word_start) {
            (true, None) => word_start = Some(offset),
            (true, Some(_)) => {}
            (false, Some(start)) => {
                rewrites += push_word(&mut text, &raw[start..offset]);
                word_start = None;
                text.push(ch);
            }
            (false, None) => text.push(ch),
        }
    }
    if let Some(start) = word_start {
        rewrites += push_word(&mut text, &raw[start..]);
    }

    crate::log_debug!(codes::success::NORMALIZATION_COMPLETE, "Expression normalized",
        "length" => raw.len(),
        "rewrites" => rewrites
    );

    NormalizedExpression { text, rewrites }
}

/// Append a word, canonicalized if it is a keyword; returns 1 if rewritten
fn push_word(out: &mut String, word: &str) -> usize {
    match Keyword::from_word(word) {
        Some(keyword) if keyword.canonical() != word => {
            out.push_str(keyword.canonical());
            1
        }
        _ => {
            out.push_str(word);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectives_are_canonicalized() {
        assert_eq!(normalize("x or y").as_str(), "x OR y");
        assert_eq!(normalize("x Or y").as_str(), "x OR y");
        assert_eq!(normalize("a And b oR c").as_str(), "a AND b OR c");
        assert_eq!(normalize("not a").as_str(), "NOT a");
    }

    #[test]
    fn test_identifiers_containing_keywords_are_untouched() {
        let normalized = normalize("orange and banana");
        assert_eq!(normalized.as_str(), "orange AND banana");
        assert_eq!(normalized.rewrites(), 1);

        assert_eq!(normalize("android or_else").as_str(), "android or_else");
        assert_eq!(normalize("ORDER AND_1").as_str(), "ORDER AND_1");
    }

    #[test]
    fn test_punctuation_delimits_words() {
        assert_eq!(normalize("(a)or(b)").as_str(), "(a)OR(b)");
        assert_eq!(normalize("!true&&False").as_str(), "!true&&false");
    }

    #[test]
    fn test_offsets_are_preserved() {
        let raw = "Alpha oR  NoT beta\tAND gamma";
        let normalized = normalize(raw);
        assert_eq!(normalized.as_str().len(), raw.len());
        assert_eq!(&normalized.as_str()[..5], "Alpha");
        assert_eq!(&normalized.as_str()[10..13], "NOT");
    }

    #[test]
    fn test_canonical_text_needs_no_rewrites() {
        let normalized = normalize("a AND NOT b OR true");
        assert_eq!(normalized.rewrites(), 0);
        assert_eq!(normalized.into_string(), "a AND NOT b OR true");
    }

    #[test]
    fn test_non_ascii_word_is_one_word() {
        // 'é' is alphanumeric, so "éor" is a single word
        assert_eq!(normalize("éor or x").as_str(), "éor OR x");
    }
}
