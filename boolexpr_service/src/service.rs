use crate::error::ServiceError;
use crate::model::Expression;
use crate::repository::ExpressionRepository;
use boolexpr_compiler::logging::codes;
use boolexpr_compiler::{log_error, log_success};
use boolexpr_compiler::{EvaluationResponse, ExpressionEvaluator, RuntimeConfig};

/// Evaluates and manages stored expressions
pub struct ExpressionService<R> {
    repository: R,
    evaluator: ExpressionEvaluator,
}

impl<R: ExpressionRepository> ExpressionService<R> {
    /// Service using the default expression language
    pub fn new(repository: R) -> Self {
        Self::with_evaluator(repository, ExpressionEvaluator::new(RuntimeConfig::strict()))
    }

    pub fn with_evaluator(repository: R, evaluator: ExpressionEvaluator) -> Self {
        Self {
            repository,
            evaluator,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Look up `expression_id` and evaluate its definition against `raw_params`
    pub fn execute_expression(
        &self,
        expression_id: &str,
        raw_params: &str,
    ) -> Result<EvaluationResponse, ServiceError> {
        let id = parse_id(expression_id)?;
        let expression = self
            .repository
            .get_expression_by_id(id)
            .map_err(|e| logged(e.into()))?;

        let response = self.evaluate_definition(&expression.definition, raw_params)?;

        log_success!(codes::success::EXPRESSION_EXECUTED, "Expression executed",
            "id" => id,
            "result" => response.result
        );
        log::info!("expression {} evaluated to {}", id, response.result);
        Ok(response)
    }

    /// Evaluate a definition that is not stored
    pub fn evaluate_definition(
        &self,
        definition: &str,
        raw_params: &str,
    ) -> Result<EvaluationResponse, ServiceError> {
        self.evaluator
            .evaluate(definition, raw_params)
            .map_err(|e| logged(e.into()))
    }

    pub fn list_expressions(&self) -> Result<Vec<Expression>, ServiceError> {
        let expressions = self
            .repository
            .get_all_expressions()
            .map_err(|e| logged(e.into()))?;
        log::info!("all expressions recovered ({})", expressions.len());
        Ok(expressions)
    }

    pub fn create_expression(&self, definition: &str) -> Result<Expression, ServiceError> {
        self.validate_definition(definition)?;
        let expression = self
            .repository
            .create_expression(definition)
            .map_err(|e| logged(e.into()))?;

        log_success!(codes::success::EXPRESSION_STORED, "Expression created", "id" => expression.id);
        Ok(expression)
    }

    pub fn save_expression(
        &self,
        expression_id: &str,
        definition: &str,
    ) -> Result<Expression, ServiceError> {
        let id = parse_id(expression_id)?;
        self.validate_definition(definition)?;
        let expression = self
            .repository
            .save_expression(id, definition)
            .map_err(|e| logged(e.into()))?;

        log_success!(codes::success::EXPRESSION_STORED, "Expression updated", "id" => id);
        Ok(expression)
    }

    pub fn delete_expression(&self, expression_id: &str) -> Result<(), ServiceError> {
        let id = parse_id(expression_id)?;
        self.repository
            .delete_expression(id)
            .map_err(|e| logged(e.into()))?;

        log_success!(codes::success::EXPRESSION_DELETED, "Expression deleted", "id" => id);
        Ok(())
    }

    /// Reject empty or malformed definitions before they are stored
    fn validate_definition(&self, definition: &str) -> Result<(), ServiceError> {
        if definition.trim().is_empty() {
            return Err(logged(ServiceError::MissingDefinition));
        }
        self.evaluator
            .compile(definition)
            .map(|_| ())
            .map_err(|e| logged(e.into()))
    }
}

fn parse_id(raw: &str) -> Result<i64, ServiceError> {
    raw.parse::<i64>().map_err(|_| {
        logged(ServiceError::InvalidExpressionId {
            raw: raw.to_string(),
        })
    })
}

fn logged(error: ServiceError) -> ServiceError {
    log_error!(error.error_code(), &error.to_string(),
        "status" => error.status().http_status()
    );
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryRepository, RepositoryCall, RepositoryStub};
    use assert_matches::assert_matches;
    use boolexpr_compiler::{PipelineError, ParseError};

    #[test]
    fn test_id_must_be_an_integer() {
        let service = ExpressionService::new(RepositoryStub::new());
        assert_matches!(
            service.execute_expression("potato", ""),
            Err(ServiceError::InvalidExpressionId { ref raw }) if raw == "potato"
        );
        assert_matches!(
            service.execute_expression(" 5", ""),
            Err(ServiceError::InvalidExpressionId { .. })
        );
        assert!(service.repository().calls().is_empty());
    }

    #[test]
    fn test_lookup_uses_parsed_id() {
        let service = ExpressionService::new(RepositoryStub::returning(Expression::new(5, "a")));
        service.execute_expression("5", "a=1").unwrap();
        assert_eq!(service.repository().calls(), vec![RepositoryCall::GetById { id: 5 }]);
    }

    #[test]
    fn test_malformed_definitions_are_not_stored() {
        let service = ExpressionService::new(RepositoryStub::new());
        assert_matches!(
            service.create_expression("a AND"),
            Err(ServiceError::Evaluation(PipelineError::Parse(ParseError::UnexpectedToken { .. })))
        );
        assert_matches!(service.create_expression("   "), Err(ServiceError::MissingDefinition));
        assert_matches!(service.save_expression("1", ""), Err(ServiceError::MissingDefinition));
        assert!(service.repository().calls().is_empty());
    }

    #[test]
    fn test_save_records_id_and_definition() {
        let service = ExpressionService::new(RepositoryStub::new());
        service.save_expression("4", "x OR NOT y").unwrap();
        assert_eq!(
            service.repository().calls(),
            vec![RepositoryCall::Save {
                id: 4,
                definition: "x OR NOT y".into()
            }]
        );
    }

    #[test]
    fn test_full_lifecycle() {
        let service = ExpressionService::new(InMemoryRepository::new());
        let created = service.create_expression("a and (b or c)").unwrap();
        let id = created.id.to_string();

        let response = service.execute_expression(&id, "a=true,b=false,c=1").unwrap();
        assert_eq!(response.definition, "a and (b or c)");
        assert!(response.result);

        service.save_expression(&id, "NOT a").unwrap();
        assert!(!service.execute_expression(&id, "a=true").unwrap().result);
        assert_eq!(service.list_expressions().unwrap().len(), 1);

        service.delete_expression(&id).unwrap();
        assert_eq!(
            service.execute_expression(&id, "a=true").unwrap_err().status(),
            crate::StatusClass::NotFound
        );
    }
}
