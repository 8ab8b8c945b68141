//! Boolean expression compiler and evaluator
//!
//! ```text
//! raw text ─▶ normalizer ─▶ lexical ─▶ syntax ─▶ Expr ─┐
//! raw params ─▶ binding ─▶ Bindings ──────────────────┴▶ evaluation ─▶ EvaluationResponse
//! ```

pub mod batch;
pub mod binding;
pub mod config;
pub mod evaluation;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod normalizer;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use batch::{BatchConfig, BatchError, BatchResults, EvaluationRequest};
pub use binding::{BindingError, Bindings};
pub use config::RuntimeConfig;
pub use evaluation::EvaluationError;
pub use grammar::Expr;
pub use lexical::LexError;
pub use pipeline::{
    compile_expression, evaluate_expression, AstCache, ErrorReport, EvaluationResponse,
    ExpressionEvaluator, PipelineError,
};
pub use syntax::ParseError;
