//! Batch evaluation
//!
//! Evaluates many `(expression, values)` requests, sequentially or split
//! across worker threads. Outcomes always come back in request order.

use crate::config::compile_time::batch::{MAX_REQUESTS_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::RuntimeConfig;
use crate::logging::{self, codes};
use crate::pipeline::{EvaluationResponse, ExpressionEvaluator, PipelineError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
// BATCH TYPES
// ============================================================================

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub fail_fast: bool,
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(MAX_WORKER_THREADS))
                .unwrap_or(4),
            fail_fast: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

/// One line of a request file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub expression: String,
    #[serde(default)]
    pub values: String,
}

impl EvaluationRequest {
    pub fn new(expression: &str, values: &str) -> Self {
        Self {
            id: None,
            expression: expression.to_string(),
            values: values.to_string(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Explicit id, or `request-N` counting from 1
    pub fn request_id(&self, index: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("request-{}", index + 1))
    }
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub index: usize,
    pub request_id: String,
    pub outcome: Result<EvaluationResponse, PipelineError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub outcomes: Vec<BatchOutcome>,
    pub duration: Duration,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.processed() - self.success_count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.processed() as f64
        }
    }

    fn add(&mut self, outcome: BatchOutcome) {
        self.outcomes.push(outcome);
    }

    fn merge(&mut self, other: BatchResults) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch evaluation completed: {} requests, {} successful ({:.1}%), {} failed, {:.2}ms total",
            self.processed(),
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.duration.as_secs_f64() * 1000.0
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Too many requests: {count} (max: {max})")]
    TooManyRequests { count: usize, max: usize },

    #[error("Cannot read request file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid request on line {line}: {message}")]
    InvalidRequest { line: usize, message: String },

    #[error("Worker thread error: {message}")]
    ThreadError { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            BatchError::TooManyRequests { .. } => codes::batch::BATCH_TOO_LARGE,
            BatchError::Io { .. } | BatchError::InvalidRequest { .. } => {
                codes::batch::REQUEST_FILE_INVALID
            }
            BatchError::ThreadError { .. } => codes::batch::WORKER_FAILURE,
        }
    }
}

// ============================================================================
// REQUEST FILES
// ============================================================================

/// Read a JSON-lines request file; blank lines are skipped
pub fn load_requests(path: &Path) -> Result<Vec<EvaluationRequest>, BatchError> {
    let content = fs::read_to_string(path).map_err(|e| BatchError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_requests(&content)
}

pub fn parse_requests(content: &str) -> Result<Vec<EvaluationRequest>, BatchError> {
    let mut requests = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let request = serde_json::from_str(line).map_err(|e| BatchError::InvalidRequest {
            line: line_index + 1,
            message: e.to_string(),
        })?;
        requests.push(request);
    }
    Ok(requests)
}

// ============================================================================
// EVALUATION
// ============================================================================

pub fn evaluate_batch(
    requests: Vec<EvaluationRequest>,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if requests.len() > MAX_REQUESTS_PER_BATCH {
        let error = BatchError::TooManyRequests {
            count: requests.len(),
            max: MAX_REQUESTS_PER_BATCH,
        };
        crate::log_error!(error.error_code(), &error.to_string());
        return Err(error);
    }

    let start_time = Instant::now();
    let evaluator = Arc::new(ExpressionEvaluator::new(config.runtime.clone()));
    let threads = config.max_threads.clamp(1, MAX_WORKER_THREADS);

    let mut results = if threads == 1 || requests.len() < 2 {
        evaluate_sequential(&evaluator, &requests, config.fail_fast)
    } else {
        evaluate_parallel(&evaluator, requests, threads, config.fail_fast)?
    };
    results.duration = start_time.elapsed();

    crate::log_performance!(codes::success::BATCH_COMPLETE, "Batch evaluation completed",
        duration = results.duration,
        "requests" => results.processed(),
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads" => threads
    );

    Ok(results)
}

fn evaluate_one(evaluator: &ExpressionEvaluator, index: usize, request: &EvaluationRequest) -> BatchOutcome {
    let request_id = request.request_id(index);
    let outcome = logging::with_evaluation_context(&request_id, || {
        evaluator.evaluate(&request.expression, &request.values)
    });
    BatchOutcome {
        index,
        request_id,
        outcome,
    }
}

fn evaluate_sequential(
    evaluator: &ExpressionEvaluator,
    requests: &[EvaluationRequest],
    fail_fast: bool,
) -> BatchResults {
    let mut results = BatchResults::new();
    for (index, request) in requests.iter().enumerate() {
        let outcome = evaluate_one(evaluator, index, request);
        let failed = !outcome.is_success();
        results.add(outcome);

        if failed && fail_fast {
            crate::log_warning!("Fail-fast enabled, stopping batch", "request" => index + 1);
            break;
        }
    }
    results
}

fn evaluate_parallel(
    evaluator: &Arc<ExpressionEvaluator>,
    requests: Vec<EvaluationRequest>,
    threads: usize,
    fail_fast: bool,
) -> Result<BatchResults, BatchError> {
    let chunk_size = calculate_chunk_size(requests.len(), threads);
    let indexed: Vec<(usize, EvaluationRequest)> = requests.into_iter().enumerate().collect();
    let mut results = BatchResults::new();

    for chunk in indexed.chunks(chunk_size) {
        let chunk_results = evaluate_chunk_parallel(evaluator, chunk, threads)?;
        results.merge(chunk_results);

        if fail_fast && results.failure_count() > 0 {
            crate::log_warning!("Fail-fast enabled, stopping batch",
                "processed" => results.processed()
            );
            break;
        }
    }

    results.outcomes.sort_by_key(|outcome| outcome.index);
    Ok(results)
}

fn evaluate_chunk_parallel(
    evaluator: &Arc<ExpressionEvaluator>,
    chunk: &[(usize, EvaluationRequest)],
    threads: usize,
) -> Result<BatchResults, BatchError> {
    let results = Arc::new(Mutex::new(BatchResults::new()));
    let per_thread = chunk.len().div_ceil(threads);
    let mut handles = Vec::new();

    for slice in chunk.chunks(per_thread.max(1)) {
        let slice = slice.to_vec();
        let evaluator = Arc::clone(evaluator);
        let results = Arc::clone(&results);

        handles.push(thread::spawn(move || {
            for (index, request) in &slice {
                let outcome = evaluate_one(&evaluator, *index, request);
                let mut guard = results.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                guard.add(outcome);
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| BatchError::ThreadError {
            message: "Worker panicked during evaluation".to_string(),
        })?;
    }

    let results = Arc::try_unwrap(results).map_err(|_| BatchError::ThreadError {
        message: "Worker results still shared after join".to_string(),
    })?;
    Ok(results.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
}

fn calculate_chunk_size(total: usize, threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 1024;

    // Each chunk is handed out to every thread at once
    (total.div_ceil(threads) * threads).clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvaluationError;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn config(max_threads: usize, fail_fast: bool) -> BatchConfig {
        BatchConfig {
            max_threads,
            fail_fast,
            runtime: RuntimeConfig::strict(),
        }
    }

    fn sample_requests() -> Vec<EvaluationRequest> {
        (0..40)
            .map(|i| {
                let a = i % 2 == 0;
                EvaluationRequest::new("a or b and c", &format!("a={a},b=true,c=false"))
            })
            .collect()
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let sequential = evaluate_batch(sample_requests(), &config(1, false)).unwrap();
        let parallel = evaluate_batch(sample_requests(), &config(4, false)).unwrap();

        assert_eq!(sequential.processed(), 40);
        assert_eq!(parallel.processed(), 40);
        for (left, right) in sequential.outcomes.iter().zip(&parallel.outcomes) {
            assert_eq!(left.index, right.index);
            assert_eq!(left.outcome, right.outcome);
        }
        assert!(parallel.outcomes[0].outcome.as_ref().unwrap().result);
        assert!(!parallel.outcomes[1].outcome.as_ref().unwrap().result);
    }

    #[test]
    fn test_failures_are_kept_in_place() {
        let requests = vec![
            EvaluationRequest::new("x", "x=1"),
            EvaluationRequest::new("x or y", "x=true").with_id("missing-y"),
            EvaluationRequest::new("NOT x", "x=0"),
        ];
        let results = evaluate_batch(requests, &config(2, false)).unwrap();

        assert_eq!(results.success_count(), 2);
        assert_eq!(results.failure_count(), 1);
        assert_eq!(results.outcomes[1].request_id, "missing-y");
        assert_matches!(
            results.outcomes[1].outcome,
            Err(PipelineError::Evaluation(EvaluationError::UnboundVariable { ref name })) if name == "y"
        );
        assert_eq!(results.outcomes[2].request_id, "request-3");
    }

    #[test]
    fn test_fail_fast_sequential() {
        let requests = vec![
            EvaluationRequest::new("&", ""),
            EvaluationRequest::new("true", ""),
        ];
        let results = evaluate_batch(requests, &config(1, true)).unwrap();
        assert_eq!(results.processed(), 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_load_requests_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"id": "first", "expression": "a AND b", "values": "a=1,b=1"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"expression": "true"}}"#).unwrap();

        let requests = load_requests(file.path()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id.as_deref(), Some("first"));
        assert_eq!(requests[1].values, "");

        let results = evaluate_batch(requests, &config(1, false)).unwrap();
        assert_eq!(results.success_count(), 2);
    }

    #[test]
    fn test_invalid_request_line() {
        let result = parse_requests("{\"expression\": \"a\"}\nnot json\n");
        assert_matches!(result, Err(BatchError::InvalidRequest { line: 2, .. }));

        let missing = load_requests(Path::new("/nonexistent/requests.jsonl"));
        assert_matches!(missing, Err(BatchError::Io { .. }));
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(100, 4), 100);
        assert_eq!(calculate_chunk_size(10, 4), 12);
        assert_eq!(calculate_chunk_size(1, 4), 4);
        assert_eq!(calculate_chunk_size(5000, 4), 1024);
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert!(config.max_threads >= 1);
        assert!(config.max_threads <= MAX_WORKER_THREADS);
        assert!(!config.fail_fast);
    }
}
