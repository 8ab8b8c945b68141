//! Recursive-descent parser
//!
//! One method per grammar rule. AND binds tighter than OR, NOT tighter
//! than AND; chains of the same connective fold to the left.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::grammar::Expr;
use crate::logging::codes;
use crate::syntax::error::{ParseError, ParseResult, EXPECTED_OPERAND};
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;
use crate::{log_debug, log_error};

pub struct ExpressionParser {
    tokens: TokenStream,
    depth: usize,
    max_depth_reached: usize,
}

impl ExpressionParser {
    pub fn new(tokens: TokenStream) -> Self {
        Self {
            tokens,
            depth: 0,
            max_depth_reached: 0,
        }
    }

    /// Deepest nesting seen during the last parse
    pub fn max_depth_reached(&self) -> usize {
        self.max_depth_reached
    }

    /// expr, then end of input
    pub fn parse(&mut self) -> ParseResult<Expr> {
        self.tokens.reset();
        self.depth = 0;
        self.max_depth_reached = 0;

        match self.parse_expression() {
            Ok(expr) => {
                log_debug!(codes::success::PARSE_COMPLETE, "Parsing completed",
                    "nodes" => expr.node_count(),
                    "depth" => self.max_depth_reached
                );
                Ok(expr)
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    span = error.span(),
                    "expected" => error.expected(),
                    "found" => error.found()
                );
                Err(error)
            }
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        if self.tokens.is_at_end() {
            return Err(ParseError::EmptyExpression {
                span: self.tokens.current_span(),
            });
        }

        let expr = self.parse_or()?;

        let trailing = self.tokens.current();
        match &trailing.value {
            Token::Eof => Ok(expr),
            Token::RParen => Err(ParseError::unopened_paren(trailing.span)),
            other => Err(ParseError::trailing_input(other, trailing.span)),
        }
    }

    /// orExpr := andExpr ( OR andExpr )*
    fn parse_or(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while matches!(self.tokens.current_token(), Token::Or) {
            self.tokens.advance();
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    /// andExpr := unary ( AND unary )*
    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while matches!(self.tokens.current_token(), Token::And) {
            self.tokens.advance();
            let right = self.parse_unary()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    /// unary := NOT unary | atom
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if matches!(self.tokens.current_token(), Token::Not) {
            let not_span = self.tokens.advance().span;
            let operand = self.nested(not_span, Self::parse_unary)?;
            return Ok(Expr::not(operand));
        }
        self.parse_atom()
    }

    /// atom := IDENTIFIER | '(' expr ')' | BOOLEAN_LITERAL
    fn parse_atom(&mut self) -> ParseResult<Expr> {
        let current = self.tokens.current().clone();
        match current.value {
            Token::Identifier(name) => {
                self.tokens.advance();
                Ok(Expr::Variable(name))
            }
            Token::BooleanLiteral(value) => {
                self.tokens.advance();
                Ok(Expr::Literal(value))
            }
            Token::LParen => {
                self.tokens.advance();
                let inner = self.nested(current.span, Self::parse_or)?;
                let closing = self.tokens.current().clone();
                match &closing.value {
                    Token::RParen => {
                        self.tokens.advance();
                        Ok(inner)
                    }
                    Token::Eof => Err(ParseError::unclosed_paren(current.span, &closing.value)),
                    other => Err(ParseError::unexpected_token("')'", other, closing.span)),
                }
            }
            Token::RParen if self.depth == 0 => Err(ParseError::unopened_paren(current.span)),
            other => Err(ParseError::unexpected_token(
                EXPECTED_OPERAND,
                &other,
                current.span,
            )),
        }
    }

    /// Run a sub-rule one nesting level deeper
    fn nested(
        &mut self,
        opener: Span,
        rule: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(ParseError::MaxDepthExceeded { span: opener });
        }
        self.depth += 1;
        self.max_depth_reached = self.max_depth_reached.max(self.depth);
        let result = rule(self);
        self.depth -= 1;
        result
    }
}
