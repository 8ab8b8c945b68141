use crate::repository::RepositoryError;
use boolexpr_compiler::logging::{codes, Code};
use boolexpr_compiler::{ErrorReport, PipelineError};
use serde::Serialize;

/// Transport-level outcome a handler should map an error to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    ClientError,
    NotFound,
    ServerError,
}

impl StatusClass {
    /// Conventional HTTP status for the class
    pub fn http_status(self) -> u16 {
        match self {
            StatusClass::ClientError => 400,
            StatusClass::NotFound => 404,
            StatusClass::ServerError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Expression id '{raw}' is not an integer")]
    InvalidExpressionId { raw: String },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Expression rejected: {0}")]
    Evaluation(#[from] PipelineError),

    #[error("Missing expression definition")]
    MissingDefinition,
}

impl ServiceError {
    pub fn status(&self) -> StatusClass {
        match self {
            ServiceError::InvalidExpressionId { .. } | ServiceError::MissingDefinition => {
                StatusClass::ClientError
            }
            ServiceError::Repository(RepositoryError::NotFound { .. }) => StatusClass::NotFound,
            ServiceError::Repository(_) => StatusClass::ServerError,
            ServiceError::Evaluation(error) if error.is_client_error() => StatusClass::ClientError,
            ServiceError::Evaluation(_) => StatusClass::ServerError,
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            ServiceError::InvalidExpressionId { .. } => codes::consumer::INVALID_EXPRESSION_ID,
            ServiceError::Repository(RepositoryError::NotFound { .. }) => {
                codes::consumer::EXPRESSION_NOT_FOUND
            }
            ServiceError::Repository(_) => codes::consumer::STORAGE_FAILURE,
            ServiceError::Evaluation(_) => codes::consumer::EVALUATION_REJECTED,
            ServiceError::MissingDefinition => codes::consumer::MISSING_DEFINITION,
        }
    }

    pub fn report(&self) -> ServiceErrorReport {
        ServiceErrorReport {
            code: self.error_code().as_str().to_string(),
            status: self.status(),
            message: self.to_string(),
            detail: match self {
                ServiceError::Evaluation(error) => Some(error.report()),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceErrorReport {
    pub code: String,
    pub status: StatusClass,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ErrorReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolexpr_compiler::EvaluationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::InvalidExpressionId { raw: "potato".into() }.status(),
            StatusClass::ClientError
        );
        assert_eq!(
            ServiceError::from(RepositoryError::NotFound { id: 5 }).status(),
            StatusClass::NotFound
        );
        assert_eq!(
            ServiceError::from(RepositoryError::storage("disk full")).status(),
            StatusClass::ServerError
        );
        let unbound = PipelineError::from(EvaluationError::UnboundVariable { name: "y".into() });
        assert_eq!(ServiceError::from(unbound).status(), StatusClass::ClientError);
        assert_eq!(StatusClass::NotFound.http_status(), 404);
    }

    #[test]
    fn test_report_carries_pipeline_detail() {
        let unbound = PipelineError::from(EvaluationError::UnboundVariable { name: "y".into() });
        let report = ServiceError::from(unbound).report();
        assert_eq!(report.code, "C005");
        assert_eq!(report.detail.as_ref().and_then(|d| d.name.as_deref()), Some("y"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "client_error");
        assert_eq!(json["detail"]["code"], "E080");
    }
}
