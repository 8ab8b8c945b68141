//! Tree-walking evaluator
//!
//! Every free variable must be bound before the walk starts; the first
//! unbound name in source order is reported. Runs of the same connective
//! (`a OR b OR c`) are walked in a loop. Depth is counted the way the
//! parser counts it: one level per NOT and per parenthesised group, so any
//! tree the parser accepts stays within `MAX_EVALUATION_DEPTH`.

pub mod error;

pub use error::EvaluationError;

use crate::binding::Bindings;
use crate::config::compile_time::evaluation::MAX_EVALUATION_DEPTH;
use crate::config::runtime::EvaluationPreferences;
use crate::grammar::Expr;
use crate::logging::codes;
use crate::{log_debug, log_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

impl Connective {
    /// Operand value that decides the whole chain
    fn absorbing(self) -> bool {
        match self {
            Connective::And => false,
            Connective::Or => true,
        }
    }
}

pub struct Evaluator {
    preferences: EvaluationPreferences,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_preferences(EvaluationPreferences::default())
    }

    pub fn with_preferences(preferences: EvaluationPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &EvaluationPreferences {
        &self.preferences
    }

    pub fn evaluate(&self, expr: &Expr, bindings: &Bindings) -> Result<bool, EvaluationError> {
        let result = check_bound(expr, bindings).and_then(|()| self.eval(expr, bindings, 0));
        match &result {
            Ok(value) => {
                log_debug!(codes::success::EVALUATION_COMPLETE, "Evaluation completed",
                    "result" => value,
                    "variables" => bindings.len()
                );
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "variable" => error.name().unwrap_or("-")
                );
            }
        }
        result
    }

    fn eval(&self, expr: &Expr, bindings: &Bindings, depth: usize) -> Result<bool, EvaluationError> {
        if depth > MAX_EVALUATION_DEPTH {
            return Err(EvaluationError::MaxDepthExceeded);
        }

        match expr {
            Expr::Literal(value) => Ok(*value),
            Expr::Variable(name) => {
                bindings
                    .get(name)
                    .ok_or_else(|| EvaluationError::UnboundVariable { name: name.clone() })
            }
            Expr::Not(operand) => {
                let operand_depth = nesting_depth(operand, None, depth + 1);
                Ok(!self.eval(operand, bindings, operand_depth)?)
            }
            Expr::And(..) => self.eval_chain(expr, Connective::And, bindings, depth),
            Expr::Or(..) => self.eval_chain(expr, Connective::Or, bindings, depth),
        }
    }

    fn eval_chain(
        &self,
        expr: &Expr,
        connective: Connective,
        bindings: &Bindings,
        depth: usize,
    ) -> Result<bool, EvaluationError> {
        let operands = chain_operands(expr, connective);
        let absorbing = connective.absorbing();
        let mut decided = false;

        for operand in operands {
            if decided && self.preferences.short_circuit {
                break;
            }
            let operand_depth = nesting_depth(operand, Some(connective), depth);
            if self.eval(operand, bindings, operand_depth)? == absorbing {
                decided = true;
            }
        }

        Ok(if decided { absorbing } else { !absorbing })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth of `child` as written in source: an AND run under OR needs no
/// parentheses, every other nested run does.
fn nesting_depth(child: &Expr, parent: Option<Connective>, depth: usize) -> usize {
    match (child, parent) {
        (Expr::And(..), Some(Connective::Or)) => depth,
        (Expr::And(..) | Expr::Or(..), _) => depth + 1,
        _ => depth,
    }
}

/// Operands of a left-leaning run of one connective, leftmost first
fn chain_operands(expr: &Expr, connective: Connective) -> Vec<&Expr> {
    let mut rights = Vec::new();
    let mut current = expr;
    loop {
        match (current, connective) {
            (Expr::And(left, right), Connective::And) | (Expr::Or(left, right), Connective::Or) => {
                rights.push(right.as_ref());
                current = left.as_ref();
            }
            _ => break,
        }
    }
    rights.push(current);
    rights.reverse();
    rights
}

fn check_bound(expr: &Expr, bindings: &Bindings) -> Result<(), EvaluationError> {
    match expr.variables_in_order().into_iter().find(|name| !bindings.contains(name)) {
        Some(name) => Err(EvaluationError::UnboundVariable {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}

/// Evaluate with environment preferences
pub fn evaluate(expr: &Expr, bindings: &Bindings) -> Result<bool, EvaluationError> {
    Evaluator::new().evaluate(expr, bindings)
}
