//! Cervical cancer clinical risk module.
//!
//! 28 behavioral/history fields, every one optional: absent values become
//! NaN sentinels and are filled by the fitted imputer. The scorer is a
//! Platt-recalibrated boosted ensemble; tiering uses the module's T1/T2
//! cutoffs rendered as "Low Risk" / "Moderate Risk" / "High Risk".

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use oncoscore_common::{Explanation, Result, RiskTier};
use oncoscore_schema::{normalize, FeatureSpec, FieldSpec, RawInput};

use crate::artifacts::read_json;
use crate::attribution::{self, DEFAULT_TOP_N};
use crate::model::TabularModel;
use crate::modules::ModuleInfo;
use crate::tiering::TierCutoffs;
use crate::transform::FittedTransform;

pub const DISCLAIMER: &str = "This is a CDS prototype. Risk estimates support, and never \
     replace, clinical judgement and national screening guidelines.";

const FIELDS: [&str; 28] = [
    "Age",
    "Number of sexual partners",
    "First sexual intercourse",
    "Num of pregnancies",
    "Smokes",
    "Smokes (years)",
    "Smokes (packs/year)",
    "Hormonal Contraceptives",
    "Hormonal Contraceptives (years)",
    "IUD",
    "IUD (years)",
    "STDs",
    "STDs (number)",
    "STDs:condylomatosis",
    "STDs:cervical condylomatosis",
    "STDs:vaginal condylomatosis",
    "STDs:vulvo-perineal condylomatosis",
    "STDs:syphilis",
    "STDs:pelvic inflammatory disease",
    "STDs:genital herpes",
    "STDs:molluscum contagiosum",
    "STDs:AIDS",
    "STDs:HIV",
    "STDs:Hepatitis B",
    "STDs:HPV",
    "STDs: Number of diagnosis",
    "STDs: Time since first diagnosis",
    "STDs: Time since last diagnosis",
];

/// The historical screening dataset records everything, flags included, as
/// numerics; missingness is pervasive, so every field is optional.
pub fn feature_spec() -> FeatureSpec {
    FeatureSpec::new(
        "cervical-1",
        FIELDS
            .iter()
            .map(|name| FieldSpec::numeric(name).optional())
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
struct ThresholdsFile {
    t1: f64,
    t2: f64,
}

#[derive(Debug, Clone)]
pub struct CervicalAssessment {
    pub probability: f64,
    pub tier: RiskTier,
    pub cutoffs: TierCutoffs,
    pub explanation: Explanation,
}

pub struct CervicalModule {
    spec: FeatureSpec,
    transform: FittedTransform,
    model: TabularModel,
    cutoffs: TierCutoffs,
    attribution_columns: Vec<String>,
    info: ModuleInfo,
}

impl CervicalModule {
    pub fn load(dir: &Path) -> Result<Self> {
        let spec = feature_spec();
        let transform: FittedTransform = read_json(&dir.join("preprocess.json"))?;
        let model: TabularModel = read_json(&dir.join("model.json"))?;
        let thresholds: ThresholdsFile = read_json(&dir.join("thresholds.json"))?;

        transform.validate(&spec)?;
        model.validate(transform.output_width())?;
        let cutoffs = TierCutoffs::new(thresholds.t1, thresholds.t2)?;

        let attribution_columns = transform.output_columns();

        info!(
            schema = %spec.version,
            t1 = cutoffs.low_upper,
            t2 = cutoffs.high_lower,
            "cervical module loaded"
        );

        Ok(Self {
            spec,
            transform,
            model,
            cutoffs,
            attribution_columns,
            info: ModuleInfo {
                name: "Cervical Cancer Clinical Risk Model".to_string(),
                model_type: "Calibrated Gradient Boosting".to_string(),
                version: "1.0.0".to_string(),
                limitations: vec![
                    "Fitted on a single-site screening cohort with heavy missingness.".to_string(),
                    "Calibrated probabilities; attributions may be approximate depending on the exported artifact.".to_string(),
                ],
            },
        })
    }

    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    pub fn cutoffs(&self) -> TierCutoffs {
        self.cutoffs
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    pub fn predict(&self, raw: &RawInput) -> Result<CervicalAssessment> {
        let vector = normalize(raw, &self.spec)?;
        let transformed = self.transform.apply(&vector)?;
        let probability = self.model.positive_probability(&transformed)?;
        let tier = self.cutoffs.classify(probability);
        let explanation = attribution::explain(
            &self.model,
            &transformed,
            &self.attribution_columns,
            probability,
            DEFAULT_TOP_N,
        );

        Ok(CervicalAssessment {
            probability,
            tier,
            cutoffs: self.cutoffs,
            explanation,
        })
    }
}
