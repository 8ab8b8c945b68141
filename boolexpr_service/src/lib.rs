//! Stored expressions
//!
//! Resolves an expression id to its definition through an
//! [`ExpressionRepository`] and evaluates it with `boolexpr_compiler`.

pub mod error;
pub mod log_bridge;
pub mod model;
pub mod repository;
pub mod service;

pub use error::{ServiceError, ServiceErrorReport, StatusClass};
pub use model::{Expression, ExpressionSnapshot};
pub use repository::{ExpressionRepository, InMemoryRepository, RepositoryError, RepositoryStub};
pub use service::ExpressionService;
