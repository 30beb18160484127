//! POST /predict/endometrial-molecular — dual-task TCGA molecular scoring.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use oncoscore_tabular::modules::molecular::DISCLAIMER;

use crate::error::ApiError;
use crate::handlers::{parse_raw_input, round4, run_inference};
use crate::state::SharedState;

pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let raw = parse_raw_input(&body)?;
    let bundle = state.bundle.clone();
    let assessment = run_inference(&state, move || bundle.molecular()?.predict(&raw)).await?;

    let probabilities: serde_json::Map<String, serde_json::Value> = assessment
        .subtype_probabilities
        .iter()
        .map(|(label, p)| (label.clone(), json!(round4(*p))))
        .collect();

    Ok(Json(json!({
        "subtype": {
            "prediction": assessment.subtype_label,
            "confidence": round4(assessment.subtype_confidence),
            "probabilities": probabilities,
        },
        "survival": {
            "prediction": assessment.survival_prediction,
            "probability_deceased": round4(assessment.probability_deceased),
            "risk_tier": assessment.survival_tier.as_str(),
        },
        "shap_explanation": assessment.explanation.items(),
        "attribution_method": assessment.explanation.method(),
        "disclaimer": DISCLAIMER,
    })))
}
