//! Expression tree
//!
//! A closed set of node kinds; evaluation is a typed walk over it, so a
//! well-formed tree can only ever produce a boolean.

use crate::binding::Bindings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Variable(String),
    Literal(bool),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn not(operand: Expr) -> Self {
        Expr::Not(Box::new(operand))
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Variable names in first-occurrence order, without repeats
    pub fn variables_in_order(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut ordered = Vec::new();
        self.visit_variables(&mut |name| {
            if seen.insert(name) {
                ordered.push(name);
            }
        });
        ordered
    }

    /// Sorted, deduplicated variable names
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.visit_variables(&mut |name| {
            names.insert(name);
        });
        names
    }

    fn visit_variables<'a>(&'a self, visit: &mut impl FnMut(&'a str)) {
        match self {
            Expr::Variable(name) => visit(name),
            Expr::Literal(_) => {}
            Expr::Not(operand) => operand.visit_variables(visit),
            Expr::And(left, right) | Expr::Or(left, right) => {
                left.visit_variables(visit);
                right.visit_variables(visit);
            }
        }
    }

    /// Replace every bound variable with its literal value
    pub fn substitute(&self, bindings: &Bindings) -> Expr {
        match self {
            Expr::Variable(name) => match bindings.get(name) {
                Some(value) => Expr::Literal(value),
                None => self.clone(),
            },
            Expr::Literal(_) => self.clone(),
            Expr::Not(operand) => Expr::not(operand.substitute(bindings)),
            Expr::And(left, right) => {
                Expr::and(left.substitute(bindings), right.substitute(bindings))
            }
            Expr::Or(left, right) => Expr::or(left.substitute(bindings), right.substitute(bindings)),
        }
    }

    /// Longest root-to-leaf path, counting the root as 1
    pub fn depth(&self) -> usize {
        match self {
            Expr::Variable(_) | Expr::Literal(_) => 1,
            Expr::Not(operand) => 1 + operand.depth(),
            Expr::And(left, right) | Expr::Or(left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Expr::Variable(_) | Expr::Literal(_) => 1,
            Expr::Not(operand) => 1 + operand.node_count(),
            Expr::And(left, right) | Expr::Or(left, right) => {
                1 + left.node_count() + right.node_count()
            }
        }
    }
}

/// Fully parenthesised canonical form; re-parsing it yields the same tree
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Not(operand) => write!(f, "NOT {}", operand),
            Expr::And(left, right) => write!(f, "({} AND {})", left, right),
            Expr::Or(left, right) => write!(f, "({} OR {})", left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Bindings;

    fn sample() -> Expr {
        // a OR (NOT b AND a)
        Expr::or(
            Expr::variable("a"),
            Expr::and(Expr::not(Expr::variable("b")), Expr::variable("a")),
        )
    }

    #[test]
    fn test_variable_collection() {
        let expr = sample();
        assert_eq!(expr.variables_in_order(), vec!["a", "b"]);
        assert_eq!(expr.variables().into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_display_is_fully_parenthesised() {
        assert_eq!(sample().to_string(), "(a OR (NOT b AND a))");
        assert_eq!(Expr::Literal(false).to_string(), "false");
    }

    #[test]
    fn test_substitute_leaves_unbound_variables() {
        let mut bindings = Bindings::new();
        bindings.insert("a", true);

        let substituted = sample().substitute(&bindings);
        assert_eq!(
            substituted,
            Expr::or(
                Expr::Literal(true),
                Expr::and(Expr::not(Expr::variable("b")), Expr::Literal(true)),
            )
        );
        assert_eq!(substituted.variables_in_order(), vec!["b"]);
    }

    #[test]
    fn test_shape_metrics() {
        let expr = sample();
        assert_eq!(expr.depth(), 4);
        assert_eq!(expr.node_count(), 6);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Expr::not(Expr::variable("x"))).unwrap();
        assert_eq!(json, serde_json::json!({"not": {"variable": "x"}}));
    }
}
