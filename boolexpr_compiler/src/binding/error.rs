use crate::config::compile_time::binding::{MAX_BINDINGS, MAX_PARAMETER_STRING_LENGTH};
use crate::logging::{codes, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("Parameter pair {index} ('{pair}') has no '=' separator")]
    MissingSeparator { pair: String, index: usize },

    #[error("Value '{raw_value}' for '{name}' is not a boolean")]
    InvalidBoolean { name: String, raw_value: String },

    #[error("Parameter pair {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Too many bindings: {count} (max {MAX_BINDINGS})")]
    TooManyBindings { count: usize },

    #[error("Parameter string too long: {length} bytes (max {MAX_PARAMETER_STRING_LENGTH})")]
    ParameterStringTooLong { length: usize },
}

impl BindingError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::MissingSeparator { .. } => codes::binding::MISSING_SEPARATOR,
            Self::InvalidBoolean { .. } => codes::binding::INVALID_BOOLEAN,
            Self::EmptyName { .. } => codes::binding::EMPTY_NAME,
            Self::TooManyBindings { .. } => codes::binding::TOO_MANY_BINDINGS,
            Self::ParameterStringTooLong { .. } => codes::binding::PARAMETER_STRING_TOO_LONG,
        }
    }

    /// Variable name involved in the failure, when one is known
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::InvalidBoolean { name, .. } => Some(name),
            _ => None,
        }
    }
}
