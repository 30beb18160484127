//! Raw caller-supplied patient attributes, prior to normalization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One raw attribute value as it arrives in the request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawValue {
    /// True when the value should be treated as absent: explicit null or an
    /// empty / whitespace-only string.
    pub fn is_absent(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render for error messages.
    pub fn display(&self) -> String {
        match self {
            RawValue::Null => "null".to_string(),
            RawValue::Bool(b) => b.to_string(),
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

/// Raw key/value patient-attribute map. Owned by the caller and never
/// mutated by the pipeline; the recommendation engine reads it alongside the
/// computed tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInput(pub HashMap<String, RawValue>);

impl RawInput {
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.get(name).filter(|v| !v.is_absent())
    }

    /// Numeric view of a field, coercing numeric strings. Absent or
    /// non-numeric values yield None.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// True when a yes/no field holds an affirmative token.
    pub fn is_yes(&self, name: &str) -> bool {
        match self.get(name) {
            Some(RawValue::Bool(b)) => *b,
            Some(RawValue::Number(n)) => *n == 1.0,
            Some(RawValue::Text(s)) => s.trim().eq_ignore_ascii_case("yes"),
            _ => false,
        }
    }

    /// String view of a categorical field.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            RawValue::Text(s) => Some(s.trim()),
            _ => None,
        }
    }
}

impl<const N: usize> From<[(&str, RawValue); N]> for RawInput {
    fn from(entries: [(&str, RawValue); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }
}
