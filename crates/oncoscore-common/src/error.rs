use thiserror::Error;

pub type Result<T> = std::result::Result<T, PredictError>;

/// Error taxonomy for the scoring pipeline.
///
/// Request-shaped variants (bad input from the caller) map to 4xx at the
/// boundary and are never retried. `Schema` and `ModelUnavailable` indicate
/// artifact/version drift or a failed startup load; both fail the readiness
/// probe and map to 5xx.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("field '{field}' has unrecognized value '{value}'")]
    InvalidEnum { field: String, value: String },

    #[error("field '{field}' expects a number, got '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("feature vector does not match fitted artifact: {0}")]
    Schema(String),

    #[error("model artifacts unavailable: {0}")]
    ModelUnavailable(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PredictError {
    /// True for errors caused by the request itself rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::MissingField(_)
                | PredictError::InvalidEnum { .. }
                | PredictError::InvalidNumber { .. }
                | PredictError::Decode(_)
        )
    }

    pub fn invalid_enum(field: &str, value: &str) -> Self {
        PredictError::InvalidEnum {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn invalid_number(field: &str, value: &str) -> Self {
        PredictError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}
