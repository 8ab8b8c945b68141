use assert_matches::assert_matches;
use boolexpr_compiler::{EvaluationError, EvaluationResponse, ParseError, PipelineError};
use boolexpr_service::{
    Expression, ExpressionService, RepositoryError, RepositoryStub, ServiceError, StatusClass,
};

fn stored(definition: &str) -> ExpressionService<RepositoryStub> {
    ExpressionService::new(RepositoryStub::returning(Expression::new(1, definition)))
}

#[test]
fn expression_id_not_a_number() {
    let service = ExpressionService::new(RepositoryStub::new());
    let error = service.execute_expression("potato", "").unwrap_err();
    assert_matches!(error, ServiceError::InvalidExpressionId { .. });
    assert_eq!(error.status(), StatusClass::ClientError);
}

#[test]
fn repository_failure() {
    let service = ExpressionService::new(RepositoryStub::failing_lookup(RepositoryError::storage(
        "error recovering from database",
    )));
    let error = service.execute_expression("5", "").unwrap_err();
    assert_matches!(error, ServiceError::Repository(RepositoryError::Storage { .. }));
    assert_eq!(error.status(), StatusClass::ServerError);
}

#[test]
fn unknown_expression() {
    let service = ExpressionService::new(RepositoryStub::new());
    let error = service.execute_expression("5", "").unwrap_err();
    assert_eq!(error, ServiceError::Repository(RepositoryError::NotFound { id: 5 }));
    assert_eq!(error.status(), StatusClass::NotFound);
}

#[test]
fn malformed_expression() {
    let error = stored("&").execute_expression("5", "").unwrap_err();
    assert_matches!(
        error,
        ServiceError::Evaluation(PipelineError::Parse(ParseError::UnexpectedToken { .. }))
    );
    assert_eq!(error.status(), StatusClass::ClientError);
}

#[test]
fn unbound_variables() {
    let error = stored("x OR y").execute_expression("5", "").unwrap_err();
    assert_eq!(
        error,
        ServiceError::Evaluation(PipelineError::Evaluation(EvaluationError::UnboundVariable {
            name: "x".to_string()
        }))
    );
}

#[test]
fn operators_with_capital_letters() {
    let response = stored("x OR y").execute_expression("5", "x=1,y=0").unwrap();
    assert_eq!(
        response,
        EvaluationResponse {
            definition: "x OR y".to_string(),
            values: "x=1,y=0".to_string(),
            result: true,
        }
    );
}

#[test]
fn operators_without_capital_letters() {
    let response = stored("x or y").execute_expression("5", "x=1,y=0").unwrap();
    assert_eq!(
        response,
        EvaluationResponse {
            definition: "x or y".to_string(),
            values: "x=1,y=0".to_string(),
            result: true,
        }
    );
}

#[test]
fn malformed_parameter_pair_is_rejected() {
    let error = stored("x").execute_expression("5", "x=true,y").unwrap_err();
    assert_matches!(error, ServiceError::Evaluation(PipelineError::Binding(_)));
    assert_eq!(error.report().code, "C005");
}
