use super::{ExpressionRepository, RepositoryError};
use crate::model::Expression;
use std::sync::Mutex;

/// A call the stub received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryCall {
    GetAll,
    GetById { id: i64 },
    Create { definition: String },
    Save { id: i64, definition: String },
    Delete { id: i64 },
}

/// Returns configured responses and records every call
#[derive(Debug, Default)]
pub struct RepositoryStub {
    pub get_all_response: Vec<Expression>,
    pub get_all_error: Option<RepositoryError>,
    pub get_by_id_response: Option<Expression>,
    pub get_by_id_error: Option<RepositoryError>,
    pub create_error: Option<RepositoryError>,
    pub save_error: Option<RepositoryError>,
    pub delete_error: Option<RepositoryError>,
    calls: Mutex<Vec<RepositoryCall>>,
}

impl RepositoryStub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(expression: Expression) -> Self {
        Self {
            get_by_id_response: Some(expression),
            ..Self::default()
        }
    }

    pub fn failing_lookup(error: RepositoryError) -> Self {
        Self {
            get_by_id_error: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RepositoryCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: RepositoryCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn configured(error: &Option<RepositoryError>) -> Result<(), RepositoryError> {
        match error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl ExpressionRepository for RepositoryStub {
    fn get_all_expressions(&self) -> Result<Vec<Expression>, RepositoryError> {
        self.record(RepositoryCall::GetAll);
        Self::configured(&self.get_all_error)?;
        Ok(self.get_all_response.clone())
    }

    fn get_expression_by_id(&self, id: i64) -> Result<Expression, RepositoryError> {
        self.record(RepositoryCall::GetById { id });
        Self::configured(&self.get_by_id_error)?;
        self.get_by_id_response
            .clone()
            .ok_or(RepositoryError::NotFound { id })
    }

    fn create_expression(&self, definition: &str) -> Result<Expression, RepositoryError> {
        self.record(RepositoryCall::Create {
            definition: definition.to_string(),
        });
        Self::configured(&self.create_error)?;
        Ok(Expression::new(1, definition))
    }

    fn save_expression(&self, id: i64, definition: &str) -> Result<Expression, RepositoryError> {
        self.record(RepositoryCall::Save {
            id,
            definition: definition.to_string(),
        });
        Self::configured(&self.save_error)?;
        Ok(Expression::new(id, definition))
    }

    fn delete_expression(&self, id: i64) -> Result<(), RepositoryError> {
        self.record(RepositoryCall::Delete { id });
        Self::configured(&self.delete_error)
    }
}
