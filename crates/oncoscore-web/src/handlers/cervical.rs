//! POST /predict/cervical — cervical cancer clinical risk.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use oncoscore_tabular::modules::cervical::DISCLAIMER;

use crate::error::ApiError;
use crate::handlers::{parse_raw_input, round4, run_inference};
use crate::state::SharedState;

pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let raw = parse_raw_input(&body)?;
    let bundle = state.bundle.clone();
    let assessment = run_inference(&state, move || bundle.cervical()?.predict(&raw)).await?;

    let guidance = oncoscore_rules::cervical::guidance(assessment.tier);

    Ok(Json(json!({
        "cancer_probability": round4(assessment.probability),
        "risk_label": assessment.tier.risk_label(),
        "thresholds": {
            "T1": assessment.cutoffs.low_upper,
            "T2": assessment.cutoffs.high_lower,
        },
        "shap_explanation": assessment.explanation.items(),
        "attribution_method": assessment.explanation.method(),
        "cds_guidance": {
            "summary": guidance.summary,
            "actions": guidance.actions,
        },
        "disclaimer": DISCLAIMER,
    })))
}
