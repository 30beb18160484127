//! Named clinical thresholds referenced by the condition rules.

use serde::{Deserialize, Serialize};

/// Clinical cutoff values, overridable from the artifact directory so
/// guideline updates do not require a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalThresholds {
    /// Endometrial thickness (mm) warranting biopsy in postmenopausal patients.
    #[serde(default = "default_postmenopausal_mm")]
    pub postmenopausal_endometrium_mm: f64,
    /// Endometrial thickness (mm) considered elevated premenopausally.
    #[serde(default = "default_premenopausal_mm")]
    pub premenopausal_endometrium_mm: f64,
    /// Upper limit of the CA-125 reference range (U/mL).
    #[serde(default = "default_ca125_upper")]
    pub ca125_upper_limit: f64,
    /// Age above which abnormal bleeding warrants endometrial evaluation.
    #[serde(default = "default_bleeding_age")]
    pub bleeding_evaluation_age: f64,
    /// BMI threshold for the obesity risk-factor rule.
    #[serde(default = "default_obesity_bmi")]
    pub obesity_bmi: f64,
}

fn default_postmenopausal_mm() -> f64 { 4.0 }
fn default_premenopausal_mm() -> f64 { 12.0 }
fn default_ca125_upper() -> f64 { 35.0 }
fn default_bleeding_age() -> f64 { 45.0 }
fn default_obesity_bmi() -> f64 { 30.0 }

impl Default for ClinicalThresholds {
    fn default() -> Self {
        Self {
            postmenopausal_endometrium_mm: default_postmenopausal_mm(),
            premenopausal_endometrium_mm: default_premenopausal_mm(),
            ca125_upper_limit: default_ca125_upper(),
            bleeding_evaluation_age: default_bleeding_age(),
            obesity_bmi: default_obesity_bmi(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let t: ClinicalThresholds = serde_json::from_str(r#"{"ca125_upper_limit": 30.0}"#).unwrap();
        assert_eq!(t.ca125_upper_limit, 30.0);
        assert_eq!(t.postmenopausal_endometrium_mm, 4.0);
        assert_eq!(t.obesity_bmi, 30.0);
    }
}
