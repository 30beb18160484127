//! Uterine cancer molecular (genomic) module: dual-task scoring of TCGA-style
//! tumor profiles.
//!
//! Task A classifies the molecular subtype with an averaging forest; task B
//! scores survival risk with an independent boosted ensemble from the same
//! raw vector through its own fitted transform. Both transforms collapse the
//! two microsatellite-instability scores into one composite column before
//! scoring. Attribution explains the survival model, whose sign maps
//! directly onto increased/decreased risk.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use oncoscore_common::{Explanation, PredictError, Result, RiskTier};
use oncoscore_schema::{normalize, FeatureSpec, FieldSpec, RawInput};

use crate::artifacts::read_json;
use crate::attribution::{self, DEFAULT_TOP_N};
use crate::model::TabularModel;
use crate::modules::ModuleInfo;
use crate::tiering::TierCutoffs;
use crate::transform::FittedTransform;

pub const DISCLAIMER: &str =
    "This is a research prototype using TCGA data. Not clinically validated for patient care.";

pub fn feature_spec() -> FeatureSpec {
    FeatureSpec::new(
        "molecular-1",
        vec![
            FieldSpec::numeric("mutation_count").with_range(0.0, 20_000.0),
            FieldSpec::numeric("fraction_genome_altered").with_range(0.0, 1.0),
            FieldSpec::numeric("diagnosis_age").with_range(18.0, 100.0),
            FieldSpec::numeric("msi_mantis_score").with_range(0.0, 2.0),
            FieldSpec::numeric("msisensor_score").with_range(0.0, 50.0),
            FieldSpec::categorical(
                "race_category",
                &[
                    "American Indian or Alaska Native",
                    "Asian",
                    "Black or African American",
                    "Native Hawaiian or Other Pacific Islander",
                    "White",
                ],
                "American Indian or Alaska Native",
            ),
        ],
    )
}

#[derive(Debug, Deserialize)]
struct ThresholdsFile {
    low_upper: f64,
    high_lower: f64,
}

/// Friendly attribution labels for the survival model's columns.
fn display_name(column: &str) -> String {
    match column {
        "mutation_count" => "Mutation Count".to_string(),
        "fraction_genome_altered" => "Fraction Genome Altered".to_string(),
        "diagnosis_age" => "Age at Diagnosis".to_string(),
        "msi_composite" => "MSI / Mutation Signature".to_string(),
        other => match other.strip_prefix("race_category_") {
            Some(race) => format!("Race ({race})"),
            None => other.replace('_', " "),
        },
    }
}

#[derive(Debug, Clone)]
pub struct MolecularAssessment {
    pub subtype_label: String,
    pub subtype_confidence: f64,
    /// (label, probability) in the artifact's class order.
    pub subtype_probabilities: Vec<(String, f64)>,
    /// "DECEASED" / "LIVING" at 0.5.
    pub survival_prediction: &'static str,
    pub probability_deceased: f64,
    pub survival_tier: RiskTier,
    pub explanation: Explanation,
}

pub struct MolecularModule {
    spec: FeatureSpec,
    subtype_transform: FittedTransform,
    survival_transform: FittedTransform,
    subtype_model: TabularModel,
    survival_model: TabularModel,
    cutoffs: TierCutoffs,
    attribution_columns: Vec<String>,
    info: ModuleInfo,
}

impl MolecularModule {
    pub fn load(dir: &Path) -> Result<Self> {
        let spec = feature_spec();
        let subtype_transform: FittedTransform = read_json(&dir.join("preprocess_subtype.json"))?;
        let survival_transform: FittedTransform = read_json(&dir.join("preprocess_survival.json"))?;
        let subtype_model: TabularModel = read_json(&dir.join("subtype_model.json"))?;
        let survival_model: TabularModel = read_json(&dir.join("survival_model.json"))?;
        let thresholds: ThresholdsFile = read_json(&dir.join("thresholds.json"))?;

        subtype_transform.validate(&spec)?;
        survival_transform.validate(&spec)?;
        subtype_model.validate(subtype_transform.output_width())?;
        survival_model.validate(survival_transform.output_width())?;
        let cutoffs = TierCutoffs::new(thresholds.low_upper, thresholds.high_lower)?;

        if subtype_model.class_labels().len() != subtype_model.n_classes() {
            return Err(PredictError::Schema(format!(
                "subtype model declares {} classes but labels {} of them",
                subtype_model.n_classes(),
                subtype_model.class_labels().len()
            )));
        }

        let attribution_columns = survival_transform
            .output_columns()
            .iter()
            .map(|c| display_name(c))
            .collect();

        info!(
            schema = %spec.version,
            subtypes = subtype_model.n_classes(),
            "molecular module loaded"
        );

        Ok(Self {
            spec,
            subtype_transform,
            survival_transform,
            subtype_model,
            survival_model,
            cutoffs,
            attribution_columns,
            info: ModuleInfo {
                name: "Uterine Cancer TCGA Molecular Classifier".to_string(),
                model_type: "Random Forest (subtype) + Gradient Boosting (survival)".to_string(),
                version: "1.0.0".to_string(),
                limitations: vec![
                    "Research prototype fitted on TCGA cohort data.".to_string(),
                    "Subtype calls are probabilistic; confirm with molecular pathology.".to_string(),
                ],
            },
        })
    }

    pub fn spec(&self) -> &FeatureSpec {
        &self.spec
    }

    pub fn info(&self) -> &ModuleInfo {
        &self.info
    }

    pub fn subtype_labels(&self) -> &[String] {
        self.subtype_model.class_labels()
    }

    pub fn predict(&self, raw: &RawInput) -> Result<MolecularAssessment> {
        let vector = normalize(raw, &self.spec)?;

        // Task A: molecular subtype.
        let x_subtype = self.subtype_transform.apply(&vector)?;
        let subtype_probs = self.subtype_model.predict_proba(&x_subtype)?;
        let subtype_index = self.subtype_model.predict_class(&x_subtype)?;
        let labels = self.subtype_model.class_labels();

        // Task B: survival risk.
        let x_survival = self.survival_transform.apply(&vector)?;
        let probability_deceased = self.survival_model.positive_probability(&x_survival)?;
        let survival_tier = self.cutoffs.classify(probability_deceased);

        let explanation = attribution::explain(
            &self.survival_model,
            &x_survival,
            &self.attribution_columns,
            probability_deceased,
            DEFAULT_TOP_N,
        );

        Ok(MolecularAssessment {
            subtype_label: labels[subtype_index].clone(),
            subtype_confidence: subtype_probs[subtype_index],
            subtype_probabilities: labels
                .iter()
                .cloned()
                .zip(subtype_probs.iter().copied())
                .collect(),
            survival_prediction: if probability_deceased >= 0.5 {
                "DECEASED"
            } else {
                "LIVING"
            },
            probability_deceased,
            survival_tier,
            explanation,
        })
    }
}
