//! HTTP handlers for all scoring and introspection routes.

pub mod cervical;
pub mod cytology;
pub mod endometrial;
pub mod health;
pub mod models;
pub mod molecular;

use oncoscore_schema::RawInput;

use crate::error::ApiError;
use crate::state::SharedState;

/// Round a probability for response payloads. Responses stay byte-identical
/// for identical inputs either way; rounding just keeps them readable.
pub(crate) fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Parse a request body into a raw attribute map. Parsed by hand so even a
/// syntactically broken body gets the `{ "error": … }` shape.
pub(crate) fn parse_raw_input(bytes: &[u8]) -> Result<RawInput, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Empty or invalid JSON body."));
    }
    serde_json::from_slice(bytes)
        .map_err(|_| ApiError::bad_request("Empty or invalid JSON body."))
}

/// Dispatch CPU-bound scoring onto the bounded blocking pool.
///
/// The semaphore caps concurrent inference at the configured worker count;
/// requests beyond the cap queue here instead of piling onto the runtime.
pub(crate) async fn run_inference<T, F>(state: &SharedState, task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> oncoscore_common::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let permit = state
        .inference
        .clone()
        .acquire_owned()
        .await
        .map_err(ApiError::internal)?;
    let result = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        task()
    })
    .await
    .map_err(ApiError::internal)?;
    result.map_err(ApiError::from)
}
