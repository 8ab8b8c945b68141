//! The evaluation pipeline
//!
//! Normalize → Lex → Parse → Bind → Evaluate → Assemble. The first stage
//! to fail ends the run and its error is returned as a [`PipelineError`].

mod cache;
mod error;
mod result;

pub use cache::AstCache;
pub use error::{ErrorReport, PipelineError};
pub use result::EvaluationResponse;

use crate::binding::{Binder, Bindings};
use crate::config::RuntimeConfig;
use crate::evaluation::Evaluator;
use crate::grammar::Expr;
use crate::lexical::LexicalAnalyzer;
use crate::logging::codes;
use crate::normalizer;
use crate::syntax::ExpressionParser;
use std::sync::Arc;
use std::time::Instant;

/// Runs the pipeline under one set of runtime preferences
///
/// Holds no per-call state; one instance can serve any number of threads.
pub struct ExpressionEvaluator {
    config: RuntimeConfig,
    cache: Option<Arc<AstCache>>,
}

impl ExpressionEvaluator {
    pub fn new(config: RuntimeConfig) -> Self {
        let cache = config
            .evaluation
            .enable_ast_cache
            .then(|| Arc::new(AstCache::new()));
        Self { config, cache }
    }

    /// Preferences read from `BOOLEXPR_*` environment variables
    pub fn from_env() -> Self {
        Self::new(RuntimeConfig::default())
    }

    /// Share an existing cache regardless of the `enable_ast_cache` preference
    pub fn with_cache(mut self, cache: Arc<AstCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<AstCache>> {
        self.cache.as_ref()
    }

    /// Normalize, lex and parse, consulting the cache when one is attached
    pub fn compile(&self, expression: &str) -> Result<Arc<Expr>, PipelineError> {
        let normalized = normalizer::normalize(expression);
        let key = self.cache_key(normalized.as_str());

        if let Some(cache) = &self.cache {
            if let Some(expr) = cache.get(&key) {
                crate::log_debug!(codes::success::CACHE_HIT, "Parsed expression served from cache",
                    "length" => expression.len()
                );
                return Ok(expr);
            }
        }

        let tokens = LexicalAnalyzer::with_preferences(self.config.lexical.clone())
            .tokenize(normalized.as_str())?;
        let expr = ExpressionParser::new(tokens).parse()?;

        Ok(match &self.cache {
            Some(cache) => cache.insert(&key, expr),
            None => Arc::new(expr),
        })
    }

    /// Trees are only shared between evaluators that lex the same dialect
    fn cache_key(&self, normalized: &str) -> String {
        let dialect = if self.config.lexical.accept_bang_negation { '!' } else { '-' };
        format!("{dialect}{normalized}")
    }

    pub fn bind(&self, raw_params: &str) -> Result<Bindings, PipelineError> {
        Ok(Binder::with_preferences(self.config.binding.clone()).bind(raw_params)?)
    }

    pub fn evaluate_compiled(&self, expr: &Expr, bindings: &Bindings) -> Result<bool, PipelineError> {
        Ok(Evaluator::with_preferences(self.config.evaluation.clone()).evaluate(expr, bindings)?)
    }

    /// Run every stage and package the verbatim inputs with the result
    pub fn evaluate(
        &self,
        expression: &str,
        raw_params: &str,
    ) -> Result<EvaluationResponse, PipelineError> {
        let start = Instant::now();

        let expr = self.compile(expression)?;
        let bindings = self.bind(raw_params)?;
        let result = self.evaluate_compiled(&expr, &bindings)?;

        crate::log_debug!(codes::success::EVALUATION_COMPLETE, "Pipeline completed",
            "result" => result,
            "duration_us" => start.elapsed().as_micros()
        );

        Ok(EvaluationResponse::new(expression, raw_params, result))
    }
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Evaluate with the default language, ignoring the environment
pub fn evaluate_expression(
    expression: &str,
    raw_params: &str,
) -> Result<EvaluationResponse, PipelineError> {
    ExpressionEvaluator::new(RuntimeConfig::strict()).evaluate(expression, raw_params)
}

/// Parse with the default language, ignoring the environment
pub fn compile_expression(expression: &str) -> Result<Expr, PipelineError> {
    let expr = ExpressionEvaluator::new(RuntimeConfig::strict()).compile(expression)?;
    Ok(Arc::unwrap_or_clone(expr))
}
