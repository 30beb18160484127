//! oncoscore-test-utils — Fixture artifact sets with hand-computable
//! parameters, shared by unit and integration tests.
//!
//! Every fixture transform is the identity (centers 0, scales 1) so tests
//! can reason about probabilities and attributions by hand.

use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use oncoscore_tabular::artifacts::{
    EnsembleKind, LinearModel, PlattCalibration, SplitSpec, Tree, TreeEnsembleModel, TreeNode,
};
use oncoscore_tabular::model::TabularModel;
use oncoscore_tabular::transform::{CompositeMerge, FittedTransform};
use oncoscore_tabular::modules::{cervical, endometrial, molecular};

/// Identity transform over the given columns, with the given medians.
pub fn identity_transform(columns: Vec<String>, medians: Vec<f64>) -> FittedTransform {
    let n = columns.len();
    FittedTransform {
        columns,
        medians,
        centers: vec![0.0; n],
        scales: vec![1.0; n],
        merge: None,
    }
}

fn write_json(path: &Path, value: &serde_json::Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
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

fn forest_stump(feature: usize, threshold: f64, left: Vec<f64>, right: Vec<f64>) -> Tree {
    let root = left.iter().zip(&right).map(|(a, b)| (a + b) / 2.0).collect();
    Tree {
        nodes: vec![
            TreeNode {
                value: root,
                split: Some(SplitSpec {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                }),
            },
            TreeNode {
                value: left,
                split: None,
            },
            TreeNode {
                value: right,
                split: None,
            },
        ],
    }
}

/// Endometrial artifacts: identity transform + logistic regression with
/// round coefficients, cutoffs 0.56 / 0.65.
pub fn write_endometrial_artifacts(dir: &Path) {
    let spec = endometrial::feature_spec();
    let columns = spec.encoded_columns();
    let transform = identity_transform(columns.clone(), vec![0.0; columns.len()]);

    // Coefficient per encoded column, in declared order.
    let coefficients = vec![
        0.01,  // Age
        0.02,  // BMI
        0.10,  // MenopauseStatus_Perimenopausal
        0.60,  // MenopauseStatus_Postmenopausal
        1.20,  // AbnormalBleeding
        0.30,  // PelvicPain
        0.20,  // VaginalDischarge
        0.40,  // UnexplainedWeightLoss
        0.15,  // ThickEndometrium
        0.015, // CA125_Level
        0.10,  // Hypertension
        0.30,  // Diabetes
        0.40,  // FamilyHistoryCancer
        0.20,  // Smoking
        0.50,  // EstrogenTherapy
        0.80,  // HistologyType_Serous
        0.90,  // HistologyType_Clear Cell
        1.10,  // HistologyType_Carcinosarcoma
        -0.15, // Parity
        -0.05, // Gravidity
        -0.20, // HormoneReceptorStatus_Positive
        0.05,  // HormoneReceptorStatus_Unknown
    ];
    let model = TabularModel::Logistic(LinearModel {
        intercept: -4.2,
        coefficients,
    });

    write_json(
        &dir.join("preprocess.json"),
        &serde_json::to_value(&transform).unwrap(),
    );
    write_json(&dir.join("model.json"), &serde_json::to_value(&model).unwrap());
    write_json(
        &dir.join("thresholds.json"),
        &json!({"low_upper": 0.56, "high_lower": 0.65}),
    );
}

/// Molecular artifacts: identity transforms with the MSI composite merge,
/// a 4-class subtype forest and a boosted survival model, cutoffs 0.3 / 0.7.
pub fn write_molecular_artifacts(dir: &Path) {
    let spec = molecular::feature_spec();
    let columns = spec.encoded_columns();
    let merge = CompositeMerge {
        first: "msi_mantis_score".to_string(),
        second: "msisensor_score".to_string(),
        output: "msi_composite".to_string(),
        position: 7,
    };
    let mut transform = identity_transform(columns.clone(), vec![0.0; columns.len()]);
    transform.merge = Some(merge);

    // Post-merge columns: mutation_count, fraction_genome_altered,
    // diagnosis_age, race x4, msi_composite (index 7).
    let subtype_model = TabularModel::Trees(TreeEnsembleModel {
        kind: EnsembleKind::Averaging,
        n_classes: 4,
        base_score: 0.0,
        trees: vec![
            forest_stump(
                7,
                0.5,
                vec![0.10, 0.15, 0.50, 0.25],
                vec![0.10, 0.65, 0.15, 0.10],
            ),
            forest_stump(
                0,
                500.0,
                vec![0.10, 0.15, 0.55, 0.20],
                vec![0.55, 0.25, 0.10, 0.10],
            ),
        ],
        feature_importances: vec![0.3, 0.05, 0.05, 0.0, 0.0, 0.0, 0.0, 0.6],
        class_labels: vec![
            "POLE Ultramutated".to_string(),
            "MSI Hypermutated".to_string(),
            "Copy Number Low".to_string(),
            "Copy Number High".to_string(),
        ],
    });

    let survival_model = TabularModel::Trees(TreeEnsembleModel {
        kind: EnsembleKind::Boosting,
        n_classes: 2,
        base_score: -0.8,
        trees: vec![
            boosted_stump(2, 65.0, -0.3, 0.7),
            boosted_stump(0, 800.0, -0.2, 0.6),
            boosted_stump(7, 1.0, -0.1, 0.5),
        ],
        feature_importances: vec![0.25, 0.05, 0.35, 0.0, 0.0, 0.0, 0.0, 0.35],
        class_labels: vec![],
    });

    write_json(
        &dir.join("preprocess_subtype.json"),
        &serde_json::to_value(&transform).unwrap(),
    );
    write_json(
        &dir.join("preprocess_survival.json"),
        &serde_json::to_value(&transform).unwrap(),
    );
    write_json(
        &dir.join("subtype_model.json"),
        &serde_json::to_value(&subtype_model).unwrap(),
    );
    write_json(
        &dir.join("survival_model.json"),
        &serde_json::to_value(&survival_model).unwrap(),
    );
    write_json(
        &dir.join("thresholds.json"),
        &json!({"low_upper": 0.3, "high_lower": 0.7}),
    );
}

/// Cervical artifacts: identity transform over 28 optional numerics and a
/// Platt-calibrated boosted ensemble, cutoffs T1 0.35 / T2 0.65.
///
/// `with_trees = false` exports importances only, which drives the
/// attribution engine onto its approximate fallback end-to-end.
pub fn write_cervical_artifacts(dir: &Path, with_trees: bool) {
    let spec = cervical::feature_spec();
    let columns = spec.encoded_columns();
    // Cohort medians for the imputer; flags default to 0.
    let medians: Vec<f64> = columns
        .iter()
        .map(|c| match c.as_str() {
            "Age" => 25.0,
            "Number of sexual partners" => 2.0,
            "First sexual intercourse" => 17.0,
            "Num of pregnancies" => 2.0,
            _ => 0.0,
        })
        .collect();
    let transform = identity_transform(columns.clone(), medians);

    let trees = if with_trees {
        vec![
            boosted_stump(0, 35.0, -0.4, 0.5),   // Age
            boosted_stump(1, 4.0, -0.2, 0.6),    // Number of sexual partners
            boosted_stump(11, 0.5, -0.3, 0.8),   // STDs flag
            boosted_stump(22, 0.5, -0.1, 1.2),   // STDs:HIV
        ]
    } else {
        vec![]
    };
    let mut importances = vec![0.0; columns.len()];
    importances[0] = 0.30;
    importances[1] = 0.20;
    importances[11] = 0.25;
    importances[22] = 0.25;

    let model = TabularModel::Calibrated {
        base: TreeEnsembleModel {
            kind: EnsembleKind::Boosting,
            n_classes: 2,
            base_score: -1.0,
            trees,
            feature_importances: importances,
            class_labels: vec![],
        },
        calibration: PlattCalibration { a: -1.1, b: 0.05 },
    };

    write_json(
        &dir.join("preprocess.json"),
        &serde_json::to_value(&transform).unwrap(),
    );
    write_json(&dir.join("model.json"), &serde_json::to_value(&model).unwrap());
    write_json(&dir.join("thresholds.json"), &json!({"t1": 0.35, "t2": 0.65}));
}

/// Write a full tabular artifact tree (endometrial + molecular + cervical)
/// into a fresh temp dir.
pub fn tabular_artifact_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_endometrial_artifacts(&tmp.path().join("endometrial"));
    write_molecular_artifacts(&tmp.path().join("molecular"));
    write_cervical_artifacts(&tmp.path().join("cervical"), true);
    tmp
}

/// The documented high-risk endometrial scenario: postmenopausal bleeding,
/// 18.5 mm stripe, CA-125 65.3, diabetic. Scores High against the fixture
/// model (z ≈ 2.50, p ≈ 0.92).
pub fn high_risk_endometrial_request() -> serde_json::Value {
    json!({
        "Age": 62,
        "BMI": 31.5,
        "MenopauseStatus": "Postmenopausal",
        "AbnormalBleeding": "Yes",
        "PelvicPain": "No",
        "VaginalDischarge": "No",
        "UnexplainedWeightLoss": "No",
        "ThickEndometrium": 18.5,
        "CA125_Level": 65.3,
        "Hypertension": "No",
        "Diabetes": "Yes",
        "FamilyHistoryCancer": "No",
        "Smoking": "No",
        "EstrogenTherapy": "No",
        "HistologyType": "Endometrioid",
        "Parity": 2,
        "Gravidity": 2,
        "HormoneReceptorStatus": "Negative"
    })
}

/// A molecular request typical of an MSI-high tumor.
pub fn molecular_request() -> serde_json::Value {
    json!({
        "mutation_count": 1200,
        "fraction_genome_altered": 0.18,
        "diagnosis_age": 66,
        "msi_mantis_score": 0.8,
        "msisensor_score": 12.4,
        "race_category": "White"
    })
}
