//! Per-feature contribution types returned by the attribution engine.

use serde::{Deserialize, Serialize};

/// Whether a feature pushed the score toward or away from the positive class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "increases risk")]
    IncreasesRisk,
    #[serde(rename = "decreases risk")]
    DecreasesRisk,
}

impl Direction {
    pub fn from_value(value: f64) -> Self {
        if value > 0.0 {
            Direction::IncreasesRisk
        } else {
            Direction::DecreasesRisk
        }
    }
}

/// One ranked feature contribution for a single scored instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribution {
    pub feature: String,
    pub shap_value: f64,
    pub direction: Direction,
}

impl Attribution {
    pub fn new(feature: impl Into<String>, value: f64) -> Self {
        Self {
            feature: feature.into(),
            shap_value: value,
            direction: Direction::from_value(value),
        }
    }
}

/// Attribution result, tagged with how it was produced.
///
/// `Approximate` carries the degraded global-importance substitution used
/// when the exact per-instance method cannot run for the loaded artifact.
/// The tag must survive to the response so callers can flag degraded
/// explanations instead of silently trusting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Explanation {
    Exact(Vec<Attribution>),
    Approximate(Vec<Attribution>),
}

impl Explanation {
    pub fn items(&self) -> &[Attribution] {
        match self {
            Explanation::Exact(items) | Explanation::Approximate(items) => items,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Explanation::Exact(_))
    }

    pub fn method(&self) -> &'static str {
        match self {
            Explanation::Exact(_) => "exact",
            Explanation::Approximate(_) => "approximate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_sign() {
        assert_eq!(Direction::from_value(0.7), Direction::IncreasesRisk);
        assert_eq!(Direction::from_value(-0.3), Direction::DecreasesRisk);
    }

    #[test]
    fn test_direction_serializes_as_phrase() {
        let a = Attribution::new("ThickEndometrium", 1.25);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["direction"], "increases risk");
    }

    #[test]
    fn test_explanation_method_tag() {
        let exact = Explanation::Exact(vec![]);
        let approx = Explanation::Approximate(vec![]);
        assert_eq!(exact.method(), "exact");
        assert_eq!(approx.method(), "approximate");
        assert!(!approx.is_exact());
    }
}
