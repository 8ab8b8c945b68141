use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub id: i64,
    pub definition: String,
}

impl Expression {
    pub fn new(id: i64, definition: &str) -> Self {
        Self {
            id,
            definition: definition.to_string(),
        }
    }
}

/// JSON form, as returned to clients
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{{\"id\":{}}}", self.id),
        }
    }
}

/// Contents of a store file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    pub expressions: Vec<Expression>,
}

impl ExpressionSnapshot {
    pub fn now(expressions: Vec<Expression>) -> Self {
        Self {
            saved_at: Some(Utc::now()),
            expressions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_json() {
        let expression = Expression::new(3, "x OR y");
        assert_eq!(expression.to_string(), r#"{"id":3,"definition":"x OR y"}"#);
    }

    #[test]
    fn test_snapshot_timestamp_is_optional() {
        let snapshot: ExpressionSnapshot =
            serde_json::from_str(r#"{"expressions":[{"id":1,"definition":"a"}]}"#).unwrap();
        assert!(snapshot.saved_at.is_none());
        assert_eq!(snapshot.expressions, vec![Expression::new(1, "a")]);

        let stamped = ExpressionSnapshot::now(Vec::new());
        let json = serde_json::to_string(&stamped).unwrap();
        let back: ExpressionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stamped);
    }
}
