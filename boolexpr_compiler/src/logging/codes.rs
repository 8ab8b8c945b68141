//! Error and success codes with their classification metadata
//!
//! Every error type in the pipeline maps onto one of these codes through its
//! `error_code()` method, so log output and error reports share one vocabulary.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for Code {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    /// Whether the caller can fix the input and retry
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_INVALID: Code = Code::new("ERR003");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const EXPRESSION_TOO_LONG: Code = Code::new("E021");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E022");
    pub const TOO_MANY_TOKENS: Code = Code::new("E023");
}

/// Syntax error codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E040");
    pub const EMPTY_EXPRESSION: Code = Code::new("E041");
    pub const UNMATCHED_PARENTHESIS: Code = Code::new("E042");
    pub const TRAILING_INPUT: Code = Code::new("E043");
    pub const MAX_PARSE_DEPTH: Code = Code::new("E044");
}

/// Parameter binding error codes
pub mod binding {
    use super::Code;

    pub const MISSING_SEPARATOR: Code = Code::new("E060");
    pub const INVALID_BOOLEAN: Code = Code::new("E061");
    pub const EMPTY_NAME: Code = Code::new("E062");
    pub const TOO_MANY_BINDINGS: Code = Code::new("E063");
    pub const PARAMETER_STRING_TOO_LONG: Code = Code::new("E064");
}

/// Evaluation error codes
pub mod evaluation {
    use super::Code;

    pub const UNBOUND_VARIABLE: Code = Code::new("E080");
    pub const MAX_EVALUATION_DEPTH: Code = Code::new("E081");
}

/// Batch evaluation error codes
pub mod batch {
    use super::Code;

    pub const BATCH_TOO_LARGE: Code = Code::new("E090");
    pub const WORKER_FAILURE: Code = Code::new("E091");
    pub const REQUEST_FILE_INVALID: Code = Code::new("E092");
}

/// Codes for consumers that resolve stored expressions before evaluating them
pub mod consumer {
    use super::Code;

    pub const INVALID_EXPRESSION_ID: Code = Code::new("C001");
    pub const EXPRESSION_NOT_FOUND: Code = Code::new("C002");
    pub const STORAGE_FAILURE: Code = Code::new("C003");
    pub const MISSING_DEFINITION: Code = Code::new("C004");
    pub const EVALUATION_REJECTED: Code = Code::new("C005");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const NORMALIZATION_COMPLETE: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
    pub const BINDING_COMPLETE: Code = Code::new("I060");
    pub const EVALUATION_COMPLETE: Code = Code::new("I080");
    pub const CACHE_HIT: Code = Code::new("I081");
    pub const BATCH_COMPLETE: Code = Code::new("I090");
    pub const EXPRESSION_EXECUTED: Code = Code::new("I100");
    pub const EXPRESSION_STORED: Code = Code::new("I101");
    pub const EXPRESSION_DELETED: Code = Code::new("I102");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const fn meta(
    code: &'static str,
    category: &'static str,
    severity: Severity,
    recoverable: bool,
    description: &'static str,
    recommended_action: &'static str,
) -> ErrorMetadata {
    ErrorMetadata {
        code,
        category,
        severity,
        recoverable,
        description,
        recommended_action,
    }
}

#[rustfmt::skip]
static METADATA: &[ErrorMetadata] = &[
    // System
    meta("ERR001", "System", Severity::Critical, false,
        "Internal error", "Report the failure with the input that produced it"),
    meta("ERR002", "System", Severity::Critical, false,
        "Logging or runtime initialization failed", "Check process configuration"),
    meta("ERR003", "System", Severity::High, false,
        "Runtime configuration is invalid", "Review BOOLEXPR_* environment variables"),
    // Lexical
    meta("E020", "Lexical", Severity::High, true,
        "Character is not part of the expression language",
        "Use identifiers, AND, OR, NOT, '!', parentheses, true or false"),
    meta("E021", "Lexical", Severity::High, true,
        "Expression text exceeds the configured maximum length", "Shorten the expression"),
    meta("E022", "Lexical", Severity::Medium, true,
        "Identifier exceeds the configured maximum length", "Use a shorter variable name"),
    meta("E023", "Lexical", Severity::High, true,
        "Expression produces more tokens than allowed", "Split the expression"),
    // Syntax
    meta("E040", "Syntax", Severity::High, true,
        "Token does not fit the grammar at this position", "Check operator placement"),
    meta("E041", "Syntax", Severity::High, true,
        "Expression is empty", "Provide at least one operand"),
    meta("E042", "Syntax", Severity::High, true,
        "Parenthesis is not matched", "Balance opening and closing parentheses"),
    meta("E043", "Syntax", Severity::High, true,
        "Input continues after a complete expression",
        "Join the operands with AND or OR"),
    meta("E044", "Syntax", Severity::High, true,
        "Expression nesting exceeds the configured depth", "Reduce nesting of parentheses and NOT"),
    // Binding
    meta("E060", "Binding", Severity::Medium, true,
        "Parameter pair has no '=' separator", "Write parameters as name=value"),
    meta("E061", "Binding", Severity::Medium, true,
        "Parameter value is not a boolean", "Use true, false, 1 or 0"),
    meta("E062", "Binding", Severity::Medium, true,
        "Parameter name is empty", "Name every parameter before '='"),
    meta("E063", "Binding", Severity::Medium, true,
        "Too many parameters", "Bind fewer variables per evaluation"),
    meta("E064", "Binding", Severity::Medium, true,
        "Parameter string exceeds the configured maximum length", "Send fewer parameters"),
    // Evaluation
    meta("E080", "Evaluation", Severity::Medium, true,
        "Expression references a variable with no binding", "Supply a value for every variable"),
    meta("E081", "Evaluation", Severity::High, false,
        "Expression tree exceeds the evaluation depth", "Reduce nesting"),
    // Batch
    meta("E090", "Batch", Severity::Medium, true,
        "Batch contains more requests than allowed", "Split the batch"),
    meta("E091", "Batch", Severity::Critical, false,
        "Batch worker thread failed", "Rerun the batch sequentially to isolate the request"),
    meta("E092", "Batch", Severity::Medium, true,
        "Batch request file could not be read", "Check the file path and JSON lines format"),
    // Consumer
    meta("C001", "Consumer", Severity::Medium, true,
        "Expression id is not a valid integer", "Pass a numeric expression id"),
    meta("C002", "Consumer", Severity::Medium, true,
        "No stored expression has this id", "List stored expressions to find the id"),
    meta("C003", "Consumer", Severity::Critical, false,
        "Expression storage failed", "Check the expression store"),
    meta("C004", "Consumer", Severity::Medium, true,
        "Expression definition is missing", "Provide a non-empty definition"),
    meta("C005", "Consumer", Severity::Medium, true,
        "Stored expression could not be evaluated", "Fix the definition or the parameters"),
    // Success
    meta("I001", "System", Severity::Low, true,
        "Logging initialized", "None"),
    meta("I010", "Normalization", Severity::Low, true,
        "Connective spellings normalized", "Continue to lexical analysis"),
    meta("I020", "Lexical", Severity::Low, true,
        "Tokenization completed", "Continue to parsing"),
    meta("I040", "Syntax", Severity::Low, true,
        "Expression tree built", "Continue to binding"),
    meta("I060", "Binding", Severity::Low, true,
        "Parameters bound", "Continue to evaluation"),
    meta("I080", "Evaluation", Severity::Low, true,
        "Expression evaluated", "None"),
    meta("I081", "Evaluation", Severity::Low, true,
        "Parsed expression served from cache", "None"),
    meta("I090", "Batch", Severity::Low, true,
        "Batch evaluation completed", "None"),
    meta("I100", "Consumer", Severity::Low, true,
        "Stored expression evaluated", "None"),
    meta("I101", "Consumer", Severity::Low, true,
        "Expression stored", "None"),
    meta("I102", "Consumer", Severity::Low, true,
        "Expression deleted", "None"),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| METADATA.iter().map(|m| (m.code, m)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
