//! Liveness / readiness probe.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::SharedState;

/// GET /health — reports whether every enabled module's artifacts are
/// loaded. Not-ready deployments answer 503 so orchestrators hold traffic.
pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    let ready = state.bundle.is_ready();
    let modules: serde_json::Map<String, serde_json::Value> = state
        .bundle
        .module_status()
        .into_iter()
        .map(|(name, loaded)| (name.to_string(), json!(loaded)))
        .collect();

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(json!({
            "status": if ready { "healthy" } else { "degraded" },
            "ready": ready,
            "modules": modules,
        })),
    )
}
