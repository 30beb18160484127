//! Oncoscore scoring service
//!
//! Run with: cargo run -p oncoscore-web

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use oncoscore_config::Config;
use oncoscore_web::artifacts::ArtifactBundle;
use oncoscore_web::router::build_router;
use oncoscore_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    info!("Starting Oncoscore scoring service...");

    // Startup is the one ordering-sensitive phase: every enabled module
    // must load and validate before the listener opens.
    let bundle = ArtifactBundle::load(&config.artifacts)
        .map_err(|e| anyhow::anyhow!("artifact load failed, refusing to serve: {e}"))?;
    for (module, _) in bundle.module_status() {
        info!(module, "module ready");
    }

    let state = Arc::new(AppState::new(bundle, config.runtime.inference_workers));
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
