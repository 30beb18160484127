//! Per-instance feature attribution.
//!
//! The primary method is exact for the model families the training pipeline
//! exports: coefficient contributions for linear models, path attributions
//! from the stored tree structure for ensembles (each traversed split
//! credits `child mean − node mean` to its split feature). When the loaded
//! artifact cannot support the exact method the engine degrades, loudly, to
//! a global-importance approximation signed by the prediction direction;
//! the two cases stay distinguishable all the way to the response.

use tracing::warn;

use oncoscore_common::{Attribution, Explanation};

use crate::artifacts::{EnsembleKind, TreeEnsembleModel};
use crate::model::TabularModel;

pub const DEFAULT_TOP_N: usize = 5;

/// Declared reasons the exact method cannot run for a loaded artifact.
#[derive(Debug, thiserror::Error)]
pub enum ExactUnsupported {
    #[error("ensemble artifact carries no tree dump")]
    NoTreeDump,
    #[error("per-instance attribution is not defined for multi-class averaging ensembles")]
    MultiClass,
}

/// Explain one scored instance.
///
/// `columns` are the transform's output column names, in scorer order.
/// `positive_probability` supplies the sign for the degraded fallback.
pub fn explain(
    model: &TabularModel,
    x: &[f64],
    columns: &[String],
    positive_probability: f64,
    top_n: usize,
) -> Explanation {
    match exact_contributions(model, x) {
        Ok(contributions) => Explanation::Exact(rank(&contributions, columns, top_n)),
        Err(reason) => {
            warn!(%reason, "exact attribution unavailable; substituting global importances");
            let approx = approximate_contributions(model, positive_probability);
            Explanation::Approximate(rank(&approx, columns, top_n))
        }
    }
}

/// Exact signed per-feature contributions for one instance.
fn exact_contributions(
    model: &TabularModel,
    x: &[f64],
) -> std::result::Result<Vec<f64>, ExactUnsupported> {
    match model {
        TabularModel::Logistic(m) => Ok(m
            .coefficients
            .iter()
            .zip(x.iter())
            .map(|(w, v)| w * v)
            .collect()),
        TabularModel::Trees(m) | TabularModel::Calibrated { base: m, .. } => {
            tree_path_contributions(m, x)
        }
    }
}

/// Saabas-style path attribution summed across the ensemble.
fn tree_path_contributions(
    m: &TreeEnsembleModel,
    x: &[f64],
) -> std::result::Result<Vec<f64>, ExactUnsupported> {
    if m.trees.is_empty() {
        return Err(ExactUnsupported::NoTreeDump);
    }
    // Scalar node value to attribute: margin for boosted trees, positive-
    // class probability for binary averaging forests.
    let scalar = |value: &[f64]| -> std::result::Result<f64, ExactUnsupported> {
        match m.kind {
            EnsembleKind::Boosting => Ok(value[0]),
            EnsembleKind::Averaging if m.n_classes == 2 => Ok(value[1]),
            EnsembleKind::Averaging => Err(ExactUnsupported::MultiClass),
        }
    };

    let mut contributions = vec![0.0; x.len()];
    for tree in &m.trees {
        let mut node = &tree.nodes[0];
        while let Some(split) = &node.split {
            let child = if x[split.feature] <= split.threshold {
                &tree.nodes[split.left]
            } else {
                &tree.nodes[split.right]
            };
            contributions[split.feature] += scalar(&child.value)? - scalar(&node.value)?;
            node = child;
        }
    }
    // Averaging forests divide by the tree count, matching predict_proba.
    if m.kind == EnsembleKind::Averaging {
        let n = m.trees.len() as f64;
        contributions.iter_mut().for_each(|c| *c /= n);
    }
    Ok(contributions)
}

/// Degraded substitute: global importances signed by the prediction side.
/// A known approximation; every value inherits one sign, so the output is
/// only directionally meaningful in aggregate.
fn approximate_contributions(model: &TabularModel, positive_probability: f64) -> Vec<f64> {
    let importances = match model {
        TabularModel::Trees(m) | TabularModel::Calibrated { base: m, .. } => {
            m.feature_importances.clone()
        }
        TabularModel::Logistic(m) => m.coefficients.iter().map(|c| c.abs()).collect(),
    };
    let sign = if positive_probability >= 0.5 { 1.0 } else { -1.0 };
    importances.into_iter().map(|i| i * sign).collect()
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Rank contributions by |value| descending, ties kept in declaration
/// order (stable sort), zeros omitted, truncated to `top_n`.
fn rank(contributions: &[f64], columns: &[String], top_n: usize) -> Vec<Attribution> {
    let mut pairs: Vec<(usize, f64)> = contributions
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| *v != 0.0 && !v.is_nan())
        .collect();
    pairs.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    pairs
        .into_iter()
        .take(top_n)
        .map(|(i, v)| Attribution::new(columns[i].clone(), round4(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{LinearModel, SplitSpec, Tree, TreeNode};
    use oncoscore_common::Direction;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn boosted_stump(feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
        Tree {
            nodes: vec![
                TreeNode {
                    value: vec![(left + right) / 2.0],
                    split: Some(SplitSpec {
                        feature,
                        threshold,
                        left: 1,
                        right: 2,
                    }),
                },
                TreeNode {
                    value: vec![left],
                    split: None,
                },
                TreeNode {
                    value: vec![right],
                    split: None,
                },
            ],
        }
    }

    #[test]
    fn test_linear_contributions_are_coefficient_times_value() {
        let model = TabularModel::Logistic(LinearModel {
            intercept: -1.0,
            coefficients: vec![0.5, -2.0, 0.0],
        });
        let explanation = explain(&model, &[2.0, 1.0, 9.0], &cols(&["a", "b", "c"]), 0.8, 5);
        assert!(explanation.is_exact());
        let items = explanation.items();
        // |−2.0| > |1.0|; the zero contribution from c is omitted
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].feature, "b");
        assert_eq!(items[0].shap_value, -2.0);
        assert_eq!(items[0].direction, Direction::DecreasesRisk);
        assert_eq!(items[1].feature, "a");
        assert_eq!(items[1].shap_value, 1.0);
    }

    #[test]
    fn test_tree_path_attribution_credits_split_feature() {
        let model = TabularModel::Trees(TreeEnsembleModel {
            kind: EnsembleKind::Boosting,
            n_classes: 2,
            base_score: 0.0,
            trees: vec![boosted_stump(1, 0.0, -1.0, 1.0)],
            feature_importances: vec![],
            class_labels: vec![],
        });
        let explanation = explain(&model, &[0.0, 2.0], &cols(&["a", "b"]), 0.7, 5);
        assert!(explanation.is_exact());
        let items = explanation.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].feature, "b");
        // right leaf (1.0) minus root mean (0.0)
        assert_eq!(items[0].shap_value, 1.0);
    }

    #[test]
    fn test_ties_break_by_declaration_order() {
        let model = TabularModel::Logistic(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0, -1.0, 1.0],
        });
        let explanation = explain(&model, &[1.0, 1.0, 1.0], &cols(&["a", "b", "c"]), 0.5, 5);
        let names: Vec<&str> = explanation.items().iter().map(|a| a.feature.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let model = TabularModel::Logistic(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0; 8],
        });
        let columns = cols(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let explanation = explain(&model, &[1.0; 8], &columns, 0.9, DEFAULT_TOP_N);
        assert_eq!(explanation.items().len(), DEFAULT_TOP_N);

        // fewer contributions than top_n returns them all
        let small = explain(&model, &[1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], &columns, 0.9, 5);
        assert_eq!(small.items().len(), 2);
    }

    #[test]
    fn test_missing_tree_dump_falls_back_to_importances() {
        let model = TabularModel::Trees(TreeEnsembleModel {
            kind: EnsembleKind::Boosting,
            n_classes: 2,
            base_score: 0.0,
            trees: vec![],
            feature_importances: vec![0.6, 0.1, 0.3],
            class_labels: vec![],
        });
        let explanation = explain(&model, &[1.0, 1.0, 1.0], &cols(&["a", "b", "c"]), 0.2, 5);
        assert!(!explanation.is_exact());
        let items = explanation.items();
        // below 0.5 the fallback signs every importance negative
        assert_eq!(items[0].feature, "a");
        assert_eq!(items[0].shap_value, -0.6);
        assert!(items
            .iter()
            .all(|a| a.direction == Direction::DecreasesRisk));
    }

    #[test]
    fn test_multiclass_averaging_falls_back() {
        let model = TabularModel::Trees(TreeEnsembleModel {
            kind: EnsembleKind::Averaging,
            n_classes: 4,
            base_score: 0.0,
            trees: vec![Tree {
                nodes: vec![TreeNode {
                    value: vec![0.25, 0.25, 0.25, 0.25],
                    split: None,
                }],
            }],
            feature_importances: vec![0.5, 0.5],
            class_labels: vec![],
        });
        let explanation = explain(&model, &[1.0, 1.0], &cols(&["a", "b"]), 0.8, 5);
        assert!(!explanation.is_exact());
        assert_eq!(explanation.items().len(), 2);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let model = TabularModel::Trees(TreeEnsembleModel {
            kind: EnsembleKind::Boosting,
            n_classes: 2,
            base_score: -0.2,
            trees: vec![
                boosted_stump(0, 0.5, -0.4, 0.4),
                boosted_stump(1, 1.5, -0.3, 0.9),
            ],
            feature_importances: vec![],
            class_labels: vec![],
        });
        let columns = cols(&["a", "b"]);
        let first = explain(&model, &[0.7, 2.0], &columns, 0.8, 5);
        let second = explain(&model, &[0.7, 2.0], &columns, 0.8, 5);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
