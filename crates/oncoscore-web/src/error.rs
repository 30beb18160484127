//! Boundary error shaping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use oncoscore_common::PredictError;

/// Error returned by every handler: a status code plus a human-readable
/// message rendered as `{ "error": … }`. Internal faults are logged with
/// their full detail but surface a generic message, never a stack trace.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        error!(%detail, "internal error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "internal error".to_string(),
        }
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        if err.is_client_error() {
            return Self {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            };
        }
        match err {
            PredictError::ModelUnavailable(_) => {
                error!(%err, "model unavailable");
                Self {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    message: err.to_string(),
                }
            }
            PredictError::Schema(_) => {
                // Artifact drift: a deployment fault, not a request fault.
                error!(%err, "schema fault");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "model artifacts are inconsistent with the declared schema"
                        .to_string(),
                }
            }
            other => Self::internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_400() {
        let err: ApiError = PredictError::MissingField("Age".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("Age"));
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let err: ApiError = PredictError::ModelUnavailable("cytology".to_string()).into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_schema_fault_hides_detail() {
        let err: ApiError = PredictError::Schema("cols 9 vs 8".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("cols"));
    }
}
