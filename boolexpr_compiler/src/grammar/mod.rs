//! Grammar of the boolean expression language
//!
//! ```text
//! expr    := orExpr
//! orExpr  := andExpr ( OR andExpr )*
//! andExpr := unary ( AND unary )*
//! unary   := NOT unary | atom
//! atom    := IDENTIFIER | '(' expr ')' | BOOLEAN_LITERAL
//! ```

pub mod ast;
pub mod keywords;

pub use ast::nodes::Expr;
pub use keywords::{is_reserved_keyword, Keyword};
