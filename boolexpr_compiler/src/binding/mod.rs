//! Parameter binding
//!
//! Turns `name=value,name=value` into a map from variable name to boolean.
//! Names are case-sensitive and kept exactly as written. A later pair for
//! the same name replaces the earlier one.

pub mod error;

pub use error::BindingError;

use crate::config::compile_time::binding::{MAX_BINDINGS, MAX_PARAMETER_STRING_LENGTH};
use crate::config::runtime::BindingPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error};
use serde::Serialize;
use std::collections::HashMap;

const PAIR_DELIMITER: char = ',';
const KEY_VALUE_SEPARATOR: char = '=';

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Bindings {
    values: HashMap<String, bool>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, returning the value it replaced
    pub fn insert(&mut self, name: impl Into<String>, value: bool) -> Option<bool> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

pub struct Binder {
    preferences: BindingPreferences,
}

impl Binder {
    pub fn new() -> Self {
        Self::with_preferences(BindingPreferences::default())
    }

    pub fn with_preferences(preferences: BindingPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &BindingPreferences {
        &self.preferences
    }

    pub fn bind(&self, raw: &str) -> Result<Bindings, BindingError> {
        let result = self.bind_pairs(raw);
        match &result {
            Ok(bindings) => {
                log_debug!(codes::success::BINDING_COMPLETE, "Binding completed",
                    "bindings" => bindings.len()
                );
            }
            Err(error) => {
                log_error!(error.error_code(), &error.to_string(),
                    "parameters_length" => raw.len()
                );
            }
        }
        result
    }

    fn bind_pairs(&self, raw: &str) -> Result<Bindings, BindingError> {
        if raw.len() > MAX_PARAMETER_STRING_LENGTH {
            return Err(BindingError::ParameterStringTooLong { length: raw.len() });
        }

        let mut bindings = Bindings::new();
        if raw.is_empty() {
            return Ok(bindings);
        }

        for (index, pair) in raw.split(PAIR_DELIMITER).enumerate() {
            if index >= MAX_BINDINGS {
                return Err(BindingError::TooManyBindings {
                    count: raw.split(PAIR_DELIMITER).count(),
                });
            }

            let Some((name, value)) = pair.split_once(KEY_VALUE_SEPARATOR) else {
                return Err(BindingError::MissingSeparator {
                    pair: pair.to_string(),
                    index,
                });
            };

            let (name, value) = if self.preferences.trim_whitespace {
                (name.trim(), value.trim())
            } else {
                (name, value)
            };

            if name.is_empty() {
                return Err(BindingError::EmptyName { index });
            }

            let parsed = self.parse_boolean(value).ok_or_else(|| BindingError::InvalidBoolean {
                name: name.to_string(),
                raw_value: value.to_string(),
            })?;

            bindings.insert(name, parsed);
        }

        Ok(bindings)
    }

    fn parse_boolean(&self, value: &str) -> Option<bool> {
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else if self.preferences.accept_numeric_booleans {
            match value {
                "1" => Some(true),
                "0" => Some(false),
                _ => None,
            }
        } else {
            None
        }
    }
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bind with environment preferences
pub fn bind(raw: &str) -> Result<Bindings, BindingError> {
    Binder::new().bind(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuntimeConfig;
    use assert_matches::assert_matches;

    fn strict() -> Binder {
        Binder::with_preferences(RuntimeConfig::strict().binding)
    }

    #[test]
    fn test_binds_pairs() {
        let bindings = strict().bind("x=true,y=FALSE,z=1,w=0").unwrap();
        assert_eq!(bindings.len(), 4);
        assert_eq!(bindings.get("x"), Some(true));
        assert_eq!(bindings.get("y"), Some(false));
        assert_eq!(bindings.get("z"), Some(true));
        assert_eq!(bindings.get("w"), Some(false));
        assert_eq!(bindings.get("v"), None);
    }

    #[test]
    fn test_empty_string_binds_nothing() {
        assert!(strict().bind("").unwrap().is_empty());
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let bindings = strict().bind("X=true,x=false").unwrap();
        assert_eq!(bindings.get("X"), Some(true));
        assert_eq!(bindings.get("x"), Some(false));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let bindings = strict().bind("x=true,x=false").unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.get("x"), Some(false));
    }

    #[test]
    fn test_value_may_contain_separator() {
        // Only the first '=' splits; the rest is the value
        assert_matches!(
            strict().bind("x=true=false"),
            Err(BindingError::InvalidBoolean { ref raw_value, .. }) if raw_value == "true=false"
        );
    }

    #[test]
    fn test_malformed_boolean() {
        let error = strict().bind("x=maybe").unwrap_err();
        assert_eq!(
            error,
            BindingError::InvalidBoolean {
                name: "x".into(),
                raw_value: "maybe".into()
            }
        );
        assert_eq!(error.name(), Some("x"));
        assert_eq!(error.error_code(), codes::binding::INVALID_BOOLEAN);
    }

    #[test]
    fn test_missing_separator() {
        assert_matches!(
            strict().bind("x=true,y"),
            Err(BindingError::MissingSeparator { ref pair, index: 1 }) if pair == "y"
        );
        assert_matches!(
            strict().bind("x=1,,y=0"),
            Err(BindingError::MissingSeparator { index: 1, .. })
        );
        assert_matches!(
            strict().bind("x=1,"),
            Err(BindingError::MissingSeparator { index: 1, .. })
        );
    }

    #[test]
    fn test_empty_name() {
        assert_matches!(strict().bind("=true"), Err(BindingError::EmptyName { index: 0 }));
    }

    #[test]
    fn test_whitespace_is_significant_by_default() {
        assert_matches!(
            strict().bind("x= true"),
            Err(BindingError::InvalidBoolean { ref raw_value, .. }) if raw_value == " true"
        );
        let bindings = strict().bind("x =true").unwrap();
        assert_eq!(bindings.get("x "), Some(true));
        assert_eq!(bindings.get("x"), None);
    }

    #[test]
    fn test_trimming_preference() {
        let mut preferences = RuntimeConfig::strict().binding;
        preferences.trim_whitespace = true;
        let bindings = Binder::with_preferences(preferences).bind(" x = true , y=0").unwrap();
        assert_eq!(bindings.get("x"), Some(true));
        assert_eq!(bindings.get("y"), Some(false));
    }

    #[test]
    fn test_numeric_booleans_can_be_disabled() {
        let mut preferences = RuntimeConfig::strict().binding;
        preferences.accept_numeric_booleans = false;
        assert_matches!(
            Binder::with_preferences(preferences).bind("x=1"),
            Err(BindingError::InvalidBoolean { .. })
        );
        assert_matches!(strict().bind("x=2"), Err(BindingError::InvalidBoolean { .. }));
    }

    #[test]
    fn test_limits() {
        let too_long = "x".repeat(MAX_PARAMETER_STRING_LENGTH + 1);
        assert_matches!(
            strict().bind(&too_long),
            Err(BindingError::ParameterStringTooLong { .. })
        );

        let pairs: Vec<String> = (0..=MAX_BINDINGS).map(|i| format!("v{i}=1")).collect();
        let raw = pairs.join(",");
        if raw.len() <= MAX_PARAMETER_STRING_LENGTH {
            assert_matches!(
                strict().bind(&raw),
                Err(BindingError::TooManyBindings { count }) if count == MAX_BINDINGS + 1
            );
        }
    }

    #[test]
    fn test_collect_into_bindings() {
        let bindings: Bindings = [("a", true), ("b", false)].into_iter().collect();
        assert_eq!(bindings.get("a"), Some(true));
        assert!(bindings.contains("b"));
        assert!(!bindings.contains("c"));
    }
}
