//! POST /predict/endometrial — uterine cancer clinical risk.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use oncoscore_tabular::modules::endometrial::DISCLAIMER;

use crate::error::ApiError;
use crate::handlers::{parse_raw_input, round4, run_inference};
use crate::state::SharedState;

pub async fn predict(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let raw = parse_raw_input(&body)?;
    let bundle = state.bundle.clone();
    let scored_input = raw.clone();
    let assessment =
        run_inference(&state, move || bundle.endometrial()?.predict(&scored_input)).await?;

    let recommendation = oncoscore_rules::endometrial::recommend(
        &raw,
        assessment.tier,
        state.bundle.clinical_thresholds(),
    );

    Ok(Json(json!({
        "prediction": assessment.prediction,
        "probability": round4(assessment.probability),
        "risk_tier": assessment.tier.as_str(),
        "risk_color": assessment.tier.color(),
        "threshold_used": {
            "low_upper": assessment.cutoffs.low_upper,
            "high_lower": assessment.cutoffs.high_lower,
        },
        "shap_explanation": assessment.explanation.items(),
        "attribution_method": assessment.explanation.method(),
        "summary": recommendation.summary,
        "clinical_recommendations": recommendation.actions,
        "disclaimer": DISCLAIMER,
    })))
}
