//! Axum router — maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{cervical, cytology, endometrial, health, models, molecular};
use crate::state::SharedState;

/// Build and return the full Axum router.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        // Probes & introspection
        .route("/health", get(health::health))
        .route("/api/models", get(models::list))
        .route("/api/models/{module}", get(models::detail))
        // Scoring endpoints
        .route("/predict/endometrial", post(endometrial::predict))
        .route("/predict/endometrial-molecular", post(molecular::predict))
        .route("/predict/cervical", post(cervical::predict))
        .route("/predict/cytology", post(cytology::predict))
        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
