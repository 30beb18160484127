//! Probability scorers over transformed feature vectors.

use serde::{Deserialize, Serialize};

use oncoscore_common::{PredictError, Result};

use crate::artifacts::{EnsembleKind, LinearModel, PlattCalibration, TreeEnsembleModel};

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// A fitted classifier, polymorphic over the model families the training
/// pipeline exports. Scoring is deterministic and performs no parameter
/// updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model_type", rename_all = "snake_case")]
pub enum TabularModel {
    Logistic(LinearModel),
    Trees(TreeEnsembleModel),
    /// Platt-recalibrated probability over a base ensemble margin.
    Calibrated {
        base: TreeEnsembleModel,
        calibration: PlattCalibration,
    },
}

impl TabularModel {
    /// Input width the fitted parameters expect, when determinable.
    pub fn expected_width(&self) -> Option<usize> {
        match self {
            TabularModel::Logistic(m) => Some(m.coefficients.len()),
            TabularModel::Trees(m) | TabularModel::Calibrated { base: m, .. } => {
                if !m.feature_importances.is_empty() {
                    Some(m.feature_importances.len())
                } else {
                    m.trees
                        .iter()
                        .filter_map(|t| t.max_feature_index())
                        .max()
                        .map(|i| i + 1)
                }
            }
        }
    }

    /// Validate the fitted parameters against the transform's output width.
    pub fn validate(&self, width: usize) -> Result<()> {
        match self.expected_width() {
            Some(w) if w != width && !matches!(self, TabularModel::Logistic(_)) => {
                // Trees only bound the width from below via split indices.
                if w > width {
                    return Err(PredictError::Schema(format!(
                        "model references feature index {} but transform emits {} columns",
                        w - 1,
                        width
                    )));
                }
                Ok(())
            }
            Some(w) if w != width => Err(PredictError::Schema(format!(
                "model fitted on {w} columns but transform emits {width}"
            ))),
            _ => Ok(()),
        }
    }

    /// Number of output classes.
    pub fn n_classes(&self) -> usize {
        match self {
            TabularModel::Logistic(_) | TabularModel::Calibrated { .. } => 2,
            TabularModel::Trees(m) => m.n_classes,
        }
    }

    /// Class labels in probability order, when the artifact declares them.
    pub fn class_labels(&self) -> &[String] {
        match self {
            TabularModel::Trees(m) | TabularModel::Calibrated { base: m, .. } => &m.class_labels,
            TabularModel::Logistic(_) => &[],
        }
    }

    /// Additive margin of a boosted ensemble for one instance.
    fn boosted_margin(m: &TreeEnsembleModel, x: &[f64]) -> f64 {
        m.base_score
            + m.trees
                .iter()
                .map(|t| t.leaf_for(x).value[0])
                .sum::<f64>()
    }

    /// Class probability vector for one transformed instance.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>> {
        match self {
            TabularModel::Logistic(m) => {
                if x.len() != m.coefficients.len() {
                    return Err(PredictError::Schema(format!(
                        "vector has {} columns, model expects {}",
                        x.len(),
                        m.coefficients.len()
                    )));
                }
                let z = m.intercept
                    + m.coefficients
                        .iter()
                        .zip(x.iter())
                        .map(|(w, v)| w * v)
                        .sum::<f64>();
                let p = sigmoid(z);
                Ok(vec![1.0 - p, p])
            }
            TabularModel::Trees(m) => match m.kind {
                EnsembleKind::Averaging => {
                    if m.trees.is_empty() {
                        return Err(PredictError::ModelUnavailable(
                            "averaging ensemble has no trees".to_string(),
                        ));
                    }
                    let mut probs = vec![0.0; m.n_classes];
                    for tree in &m.trees {
                        let leaf = tree.leaf_for(x);
                        if leaf.value.len() != m.n_classes {
                            return Err(PredictError::Schema(format!(
                                "leaf holds {} classes, ensemble declares {}",
                                leaf.value.len(),
                                m.n_classes
                            )));
                        }
                        for (acc, v) in probs.iter_mut().zip(&leaf.value) {
                            *acc += v;
                        }
                    }
                    let n = m.trees.len() as f64;
                    probs.iter_mut().for_each(|p| *p /= n);
                    Ok(probs)
                }
                EnsembleKind::Boosting => {
                    let p = sigmoid(Self::boosted_margin(m, x));
                    Ok(vec![1.0 - p, p])
                }
            },
            TabularModel::Calibrated { base, calibration } => {
                let margin = Self::boosted_margin(base, x);
                let p = 1.0 / (1.0 + (calibration.a * margin + calibration.b).exp());
                Ok(vec![1.0 - p, p])
            }
        }
    }

    /// P(positive class) for binary models.
    pub fn positive_probability(&self, x: &[f64]) -> Result<f64> {
        Ok(self.predict_proba(x)?[1])
    }

    /// Index of the most probable class.
    pub fn predict_class(&self, x: &[f64]) -> Result<usize> {
        let probs = self.predict_proba(x)?;
        Ok(probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0))
    }
}
