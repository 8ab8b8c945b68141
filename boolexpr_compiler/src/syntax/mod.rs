//! Syntax analysis: token stream to expression tree

pub mod error;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::ExpressionParser;

use crate::grammar::Expr;
use crate::tokens::TokenStream;

pub fn parse(tokens: TokenStream) -> ParseResult<Expr> {
    ExpressionParser::new(tokens).parse()
}
