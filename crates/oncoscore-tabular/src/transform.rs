//! Fitted preprocessing transform: imputation, scaling, and the optional
//! composite merge of correlated genomic columns.

use serde::{Deserialize, Serialize};

use oncoscore_common::{PredictError, Result};
use oncoscore_schema::{FeatureSpec, FeatureVector};

/// Merge two correlated, already-scaled columns into one composite column.
///
/// The molecular module collapses its two microsatellite-instability scores
/// into a single component this way. The merge runs after imputation and
/// scaling, drops both source columns, and inserts the composite at the
/// exact index the fitted scorer expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeMerge {
    pub first: String,
    pub second: String,
    pub output: String,
    pub position: usize,
}

/// Fitted imputation + scaling parameters for one module.
///
/// `columns` records the encoded column order the transform was fitted on;
/// it is checked against the module's `FeatureSpec` at load so column-order
/// drift surfaces as a startup fault, never as silently corrupted scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedTransform {
    pub columns: Vec<String>,
    pub medians: Vec<f64>,
    pub centers: Vec<f64>,
    pub scales: Vec<f64>,
    #[serde(default)]
    pub merge: Option<CompositeMerge>,
}

impl FittedTransform {
    /// Validate internal consistency and agreement with the declared schema.
    pub fn validate(&self, spec: &FeatureSpec) -> Result<()> {
        let n = self.columns.len();
        if self.medians.len() != n || self.centers.len() != n || self.scales.len() != n {
            return Err(PredictError::Schema(format!(
                "transform parameter lengths disagree: {} columns, {} medians, {} centers, {} scales",
                n,
                self.medians.len(),
                self.centers.len(),
                self.scales.len()
            )));
        }
        if let Some(i) = self.scales.iter().position(|s| *s <= 0.0) {
            return Err(PredictError::Schema(format!(
                "non-positive scale for column '{}'",
                self.columns[i]
            )));
        }
        let expected = spec.encoded_columns();
        if self.columns != expected {
            return Err(PredictError::Schema(format!(
                "transform fitted on columns {:?} but schema '{}' declares {:?}",
                self.columns, spec.version, expected
            )));
        }
        if let Some(merge) = &self.merge {
            if merge.first == merge.second {
                return Err(PredictError::Schema(
                    "composite merge sources must be distinct columns".to_string(),
                ));
            }
            for name in [&merge.first, &merge.second] {
                if !self.columns.iter().any(|c| c == name) {
                    return Err(PredictError::Schema(format!(
                        "composite merge references unknown column '{name}'"
                    )));
                }
            }
            if merge.position + 2 > self.columns.len() {
                return Err(PredictError::Schema(format!(
                    "composite merge position {} out of bounds",
                    merge.position
                )));
            }
        }
        Ok(())
    }

    /// Column names of the transform output, after any merge.
    pub fn output_columns(&self) -> Vec<String> {
        let Some(merge) = &self.merge else {
            return self.columns.clone();
        };
        let mut out: Vec<String> = self
            .columns
            .iter()
            .filter(|c| **c != merge.first && **c != merge.second)
            .cloned()
            .collect();
        out.insert(merge.position, merge.output.clone());
        out
    }

    /// Output width seen by the scorer.
    pub fn output_width(&self) -> usize {
        match &self.merge {
            Some(_) => self.columns.len() - 1,
            None => self.columns.len(),
        }
    }

    /// Apply the fitted transform to one normalized vector.
    ///
    /// Pure: imputes NaN sentinels with fitted medians, scales with fitted
    /// centers/scales, then applies the composite merge if declared.
    pub fn apply(&self, vector: &FeatureVector) -> Result<Vec<f64>> {
        if vector.len() != self.columns.len() {
            return Err(PredictError::Schema(format!(
                "feature vector has {} columns, transform expects {}",
                vector.len(),
                self.columns.len()
            )));
        }

        let mut scaled: Vec<f64> = vector
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let filled = if v.is_nan() { self.medians[i] } else { v };
                (filled - self.centers[i]) / self.scales[i]
            })
            .collect();

        if let Some(merge) = &self.merge {
            let index_of = |name: &str| {
                self.columns.iter().position(|c| c == name).ok_or_else(|| {
                    PredictError::Schema(format!("composite merge references unknown column '{name}'"))
                })
            };
            let ia = index_of(&merge.first)?;
            let ib = index_of(&merge.second)?;
            let composite = (scaled[ia] + scaled[ib]) / 2.0;
            let mut merged: Vec<f64> = scaled
                .drain(..)
                .enumerate()
                .filter(|(i, _)| *i != ia && *i != ib)
                .map(|(_, v)| v)
                .collect();
            if merge.position > merged.len() {
                return Err(PredictError::Schema(format!(
                    "composite merge position {} out of bounds",
                    merge.position
                )));
            }
            merged.insert(merge.position, composite);
            scaled = merged;
        }

        Ok(scaled)
    }
}
