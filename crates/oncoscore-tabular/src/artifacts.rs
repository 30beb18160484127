//! Serialized forms of the fitted model artifacts.
//!
//! Artifacts are exported offline by the training pipeline as JSON and read
//! once at startup. Any load failure is a `ModelUnavailable` fault and must
//! keep the service out of the ready state.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use oncoscore_common::{PredictError, Result};

/// Fitted logistic regression: p = sigmoid(intercept + w·x).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// One node of a fitted decision tree. `value` is the mean prediction over
/// the training rows that reached the node (class distribution for
/// averaging ensembles, scalar margin for boosted ones); the attribution
/// engine walks these to credit each split feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub value: Vec<f64>,
    #[serde(default)]
    pub split: Option<SplitSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSpec {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
}

/// Node 0 is the root; children are indices into `nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

/// How the ensemble combines its trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsembleKind {
    /// Random-forest style: leaf class distributions are averaged.
    Averaging,
    /// Gradient boosting: leaf margins are summed onto `base_score`, then
    /// squashed through a sigmoid.
    Boosting,
}

/// Fitted tree ensemble.
///
/// `trees` may be empty when the exporter only dumped global importances;
/// the attribution engine treats that as a declared primary-method failure
/// and degrades to the importance-based approximation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    pub kind: EnsembleKind,
    pub n_classes: usize,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub feature_importances: Vec<f64>,
    /// Class labels in probability order, for multi-class ensembles.
    #[serde(default)]
    pub class_labels: Vec<String>,
}

/// Platt sigmoid recalibration fitted over a base model's margin:
/// p = 1 / (1 + exp(a·m + b)).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlattCalibration {
    pub a: f64,
    pub b: f64,
}

/// Read and deserialize one JSON artifact file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = std::fs::read(path).map_err(|e| {
        PredictError::ModelUnavailable(format!("{}: {}", path.display(), e))
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        PredictError::ModelUnavailable(format!("{}: {}", path.display(), e))
    })
}

impl Tree {
    /// Follow the fitted split rules down to a leaf for one instance.
    pub fn leaf_for(&self, x: &[f64]) -> &TreeNode {
        let mut node = &self.nodes[0];
        while let Some(split) = &node.split {
            node = if x[split.feature] <= split.threshold {
                &self.nodes[split.left]
            } else {
                &self.nodes[split.right]
            };
        }
        node
    }

    /// Highest feature index referenced by any split, if the tree has one.
    pub fn max_feature_index(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| n.split.as_ref().map(|s| s.feature))
            .max()
    }
}
