//! Endometrial (uterine) cancer clinical risk module.
//!
//! 18 raw clinical fields scored by a fitted logistic regression, tiered by
//! configured cutoffs, explained by exact coefficient contributions.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use oncoscore_common::{Explanation, Result, RiskTier};
use oncoscore_schema::{normalize, FeatureSpec, FieldSpec, RawInput};

use crate::artifacts::read_json;
use crate::attribution::{self, DEFAULT_TOP_N};
use crate::model::TabularModel;
use crate::modules::{humanize, ModuleInfo};
use crate::tiering::TierCutoffs;
use crate::transform::FittedTransform;

pub const DISCLAIMER: &str = "This is a CDS prototype using synthetic data. Results are not \
     clinically validated. Always defer to clinical judgement.";

/// Declared raw field order. This must match the order the preprocessing
/// transform was fitted on; the load path cross-checks it.
pub fn feature_spec() -> FeatureSpec {
    FeatureSpec::new(
        "endometrial-1",
        vec![
            FieldSpec::numeric("Age").with_range(18.0, 100.0),
            FieldSpec::numeric("BMI").with_range(10.0, 70.0),
            FieldSpec::categorical(
                "MenopauseStatus",
                &["Premenopausal", "Perimenopausal", "Postmenopausal"],
                "Premenopausal",
            ),
            FieldSpec::boolean("AbnormalBleeding"),
            FieldSpec::boolean("PelvicPain"),
            FieldSpec::boolean("VaginalDischarge"),
            FieldSpec::boolean("UnexplainedWeightLoss"),
            FieldSpec::numeric("ThickEndometrium").with_range(0.0, 50.0),
            FieldSpec::numeric("CA125_Level").with_range(0.0, 1000.0),
            FieldSpec::boolean("Hypertension"),
            FieldSpec::boolean("Diabetes"),
            FieldSpec::boolean("FamilyHistoryCancer"),
            FieldSpec::boolean("Smoking"),
            FieldSpec::boolean("EstrogenTherapy"),
            FieldSpec::categorical(
                "HistologyType",
                &["Endometrioid", "Serous", "Clear Cell", "Carcinosarcoma"],
                "Endometrioid",
            ),
            FieldSpec::numeric("Parity").with_range(0.0, 15.0),
            FieldSpec::numeric("Gravidity").with_range(0.0, 20.0),
            FieldSpec::categorical(
                "HormoneReceptorStatus",
                &["Negative", "Positive", "Unknown"],
                "Negative",
            ),
        ],
    )
}

#[derive(Debug, Deserialize)]
struct ThresholdsFile {
    low_upper: f64,
    high_lower: f64,
}

/// Scoring output consumed by the boundary, before recommendations and the
/// disclaimer are attached.
#[derive(Debug, Clone)]
pub struct EndometrialAssessment {
    /// Positive-class call at 0.5.
    pub prediction: u8,
    pub probability: f64,
    pub tier: RiskTier,
    pub cutoffs: TierCutoffs,
    pub explanation: Explanation,
}

#[derive(Debug)]
pub struct EndometrialModule {
    spec: FeatureSpec,
    transform: FittedTransform,
    model: TabularModel,
    cutoffs: TierCutoffs,
    attribution_columns: Vec<String>,
    info: ModuleInfo,
}

impl EndometrialModule {
    /// Load and cross-validate the fitted artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let spec = feature_spec();
        let transform: FittedTransform = read_json(&dir.join("preprocess.json"))?;
        let model: TabularModel = read_json(&dir.join("model.json"))?;
        let thresholds: ThresholdsFile = read_json(&dir.join("thresholds.json"))?;

        transform.validate(&spec)?;
        model.validate(transform.output_width())?;
        let cutoffs = TierCutoffs::new(thresholds.low_upper, thresholds.high_lower)?;

        let attribution_columns = transform
            .output_columns()
            .iter()
            .map(|c| humanize(c))
            .collect();

        info!(
            schema = %spec.version,
            low_upper = cutoffs.low_upper,
            high_lower = cutoffs.high_lower,
            "endometrial module loaded"
        );

        Ok(Self {
            spec,
            transform,
            model,
            cutoffs,
            attribution_columns,
            info: ModuleInfo {
                name: "Uterine Cancer Risk Estimator".to_string(),
                model_type: "Logistic Regression (class weighting)".to_string(),
                version: "1.0.0".to_string(),
                limitations: vec![
                    "Trained on synthetic data — not clinically validated.".to_string(),
                    "Intended as a clinical decision support prototype only.".to_string(),
                    "Feature attributions describe this model, not causal biology.".to_string(),
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

    /// Score one raw patient-attribute map.
    pub fn predict(&self, raw: &RawInput) -> Result<EndometrialAssessment> {
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

        Ok(EndometrialAssessment {
            prediction: u8::from(probability >= 0.5),
            probability,
            tier,
            cutoffs: self.cutoffs,
            explanation,
        })
    }
}
