use crate::config::compile_time::evaluation::MAX_EVALUATION_DEPTH;
use crate::logging::{codes, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("Variable '{name}' is not bound")]
    UnboundVariable { name: String },

    #[error("Expression tree nested deeper than {MAX_EVALUATION_DEPTH} levels")]
    MaxDepthExceeded,
}

impl EvaluationError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnboundVariable { .. } => codes::evaluation::UNBOUND_VARIABLE,
            Self::MaxDepthExceeded => codes::evaluation::MAX_EVALUATION_DEPTH,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::UnboundVariable { name } => Some(name),
            Self::MaxDepthExceeded => None,
        }
    }
}
