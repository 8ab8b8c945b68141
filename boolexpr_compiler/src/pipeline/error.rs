use crate::binding::BindingError;
use crate::evaluation::EvaluationError;
use crate::lexical::LexError;
use crate::logging::{codes, Code};
use crate::syntax::ParseError;
use serde::Serialize;

/// First failure of an evaluation, tagged with the stage that produced it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Lexical analysis failed: {0}")]
    Lex(#[from] LexError),

    #[error("Syntax analysis failed: {0}")]
    Parse(#[from] ParseError),

    #[error("Parameter binding failed: {0}")]
    Binding(#[from] BindingError),

    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Lex(e) => e.error_code(),
            Self::Parse(e) => e.error_code(),
            Self::Binding(e) => e.error_code(),
            Self::Evaluation(e) => e.error_code(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Lex(_) => "lexical",
            Self::Parse(_) => "syntax",
            Self::Binding(_) => "binding",
            Self::Evaluation(_) => "evaluation",
        }
    }

    /// Whether the failure is caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    /// Byte offset into the expression text, for lexical and syntax errors
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lex(LexError::ExpressionTooLong { .. }) => None,
            Self::Lex(e) => Some(e.offset()),
            Self::Parse(e) => Some(e.position()),
            Self::Binding(_) | Self::Evaluation(_) => None,
        }
    }

    /// Variable name involved, for binding and evaluation errors
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Binding(e) => e.name(),
            Self::Evaluation(e) => e.name(),
            Self::Lex(_) | Self::Parse(_) => None,
        }
    }

    pub fn report(&self) -> ErrorReport {
        let message = match self {
            Self::Lex(e) => e.to_string(),
            Self::Parse(e) => e.to_string(),
            Self::Binding(e) => e.to_string(),
            Self::Evaluation(e) => e.to_string(),
        };
        ErrorReport {
            code: self.error_code().as_str().to_string(),
            stage: self.stage(),
            message,
            position: self.position(),
            name: self.name().map(str::to_string),
        }
    }
}

/// Serialisable form of a [`PipelineError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub stage: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
