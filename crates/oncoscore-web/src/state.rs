//! Shared application state for the web server.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::artifacts::ArtifactBundle;

/// Shared state injected into every Axum handler. The bundle is immutable
/// after startup, so concurrent requests read it without locking; the
/// semaphore bounds concurrent CPU-bound inference to keep tail latency
/// predictable under load.
pub struct AppState {
    pub bundle: Arc<ArtifactBundle>,
    pub inference: Arc<Semaphore>,
}

impl AppState {
    pub fn new(bundle: ArtifactBundle, inference_workers: usize) -> Self {
        Self {
            bundle: Arc::new(bundle),
            inference: Arc::new(Semaphore::new(inference_workers.max(1))),
        }
    }
}

pub type SharedState = Arc<AppState>;
