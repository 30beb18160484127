//! POST /predict/cytology — Pap smear image classification.

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::handlers::{round4, run_inference};
use crate::state::SharedState;

pub async fn predict(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut payload: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("could not read upload: {e}")))?;
            payload = Some(bytes.to_vec());
            break;
        }
    }

    let bytes = payload.ok_or_else(|| {
        ApiError::bad_request("No file uploaded. Include a 'file' field in form-data.")
    })?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Empty upload — no image data received."));
    }

    let bundle = state.bundle.clone();
    let prediction = run_inference(&state, move || bundle.cytology()?.classify(&bytes)).await?;

    let class_probabilities: serde_json::Map<String, serde_json::Value> = prediction
        .class_probabilities
        .iter()
        .map(|(label, p)| (label.clone(), json!(round4(*p))))
        .collect();

    Ok(Json(json!({
        "prediction": prediction.prediction,
        "confidence": round4(prediction.confidence),
        "classes": prediction.classes,
        "class_probabilities": class_probabilities,
    })))
}
