//! Model-info endpoints: what is deployed, with which schemas and cutoffs.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/models — summary of every loaded module.
pub async fn list(State(state): State<SharedState>) -> impl IntoResponse {
    let bundle = &state.bundle;
    let mut models = Vec::new();

    if let Ok(m) = bundle.endometrial() {
        models.push(json!({
            "module": "endometrial",
            "name": m.info().name,
            "model_type": m.info().model_type,
            "version": m.info().version,
        }));
    }
    if let Ok(m) = bundle.molecular() {
        models.push(json!({
            "module": "molecular",
            "name": m.info().name,
            "model_type": m.info().model_type,
            "version": m.info().version,
        }));
    }
    if let Ok(m) = bundle.cervical() {
        models.push(json!({
            "module": "cervical",
            "name": m.info().name,
            "model_type": m.info().model_type,
            "version": m.info().version,
        }));
    }
    if let Ok(m) = bundle.cytology() {
        models.push(json!({
            "module": "cytology",
            "name": "Cervical Cytology Image Classifier",
            "model_type": "ResNet-50",
            "classes": m.classes(),
        }));
    }

    Json(json!({ "models": models }))
}

/// GET /api/models/{module} — full schema and threshold detail.
pub async fn detail(
    State(state): State<SharedState>,
    Path(module): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bundle = &state.bundle;
    let body = match module.as_str() {
        "endometrial" => {
            let m = bundle.endometrial()?;
            json!({
                "name": m.info().name,
                "model_type": m.info().model_type,
                "version": m.info().version,
                "schema_version": m.spec().version,
                "features": m.spec().field_names(),
                "thresholds": {
                    "low_upper": m.cutoffs().low_upper,
                    "high_lower": m.cutoffs().high_lower,
                },
                "limitations": m.info().limitations,
            })
        }
        "molecular" => {
            let m = bundle.molecular()?;
            json!({
                "name": m.info().name,
                "model_type": m.info().model_type,
                "version": m.info().version,
                "schema_version": m.spec().version,
                "features": m.spec().field_names(),
                "subtypes": m.subtype_labels(),
                "limitations": m.info().limitations,
            })
        }
        "cervical" => {
            let m = bundle.cervical()?;
            json!({
                "name": m.info().name,
                "model_type": m.info().model_type,
                "version": m.info().version,
                "schema_version": m.spec().version,
                "features": m.spec().field_names(),
                "thresholds": {
                    "T1": m.cutoffs().low_upper,
                    "T2": m.cutoffs().high_lower,
                },
                "limitations": m.info().limitations,
            })
        }
        "cytology" => {
            let m = bundle.cytology()?;
            json!({
                "name": "Cervical Cytology Image Classifier",
                "model_type": "ResNet-50",
                "version": "1.0.0",
                "classes": m.classes(),
                "input": "multipart/form-data image under a 'file' field (JPEG/PNG/BMP/TIFF)",
            })
        }
        other => {
            return Err(ApiError::not_found(format!("unknown module '{other}'")));
        }
    };
    Ok(Json(body))
}
