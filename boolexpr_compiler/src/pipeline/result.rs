use serde::{Deserialize, Serialize};

/// Outcome of one evaluation
///
/// `definition` and `values` are the caller's text exactly as received,
/// never the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub definition: String,
    pub values: String,
    pub result: bool,
}

impl EvaluationResponse {
    pub fn new(definition: &str, values: &str, result: bool) -> Self {
        Self {
            definition: definition.to_string(),
            values: values.to_string(),
            result,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
