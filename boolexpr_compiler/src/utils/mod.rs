//! Shared primitives used by the lexer, parser and error reporting.

pub mod span;

pub use span::{Position, Span, Spanned};
