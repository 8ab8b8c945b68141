//! Expression storage
//!
//! The service only sees [`ExpressionRepository`]; the in-memory store
//! backs the CLI and the stub backs service tests.

mod memory;
mod stub;

pub use memory::InMemoryRepository;
pub use stub::{RepositoryCall, RepositoryStub};

use crate::model::Expression;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Expression {id} not found")]
    NotFound { id: i64 },

    #[error("Storage failure: {message}")]
    Storage { message: String },

    #[error("Cannot load store file {path}: {message}")]
    Seed { path: String, message: String },
}

impl RepositoryError {
    pub fn storage(message: impl ToString) -> Self {
        Self::Storage {
            message: message.to_string(),
        }
    }
}

pub trait ExpressionRepository: Send + Sync {
    fn get_all_expressions(&self) -> Result<Vec<Expression>, RepositoryError>;

    fn get_expression_by_id(&self, id: i64) -> Result<Expression, RepositoryError>;

    /// Store a new definition under the next free id
    fn create_expression(&self, definition: &str) -> Result<Expression, RepositoryError>;

    /// Replace the definition of an existing expression
    fn save_expression(&self, id: i64, definition: &str) -> Result<Expression, RepositoryError>;

    fn delete_expression(&self, id: i64) -> Result<(), RepositoryError>;
}
