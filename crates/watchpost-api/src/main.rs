//! WatchPost Gateway - Main Entry Point

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watchpost_api::{build_router, AppState, DirectoryBackend, NacDirectory};
use watchpost_nac::NacConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("WatchPost Gateway v{}", env!("CARGO_PKG_VERSION"));

    let directory = NacConfig::from_env()?
        .map(|config| Arc::new(NacDirectory::new(config)) as Arc<dyn DirectoryBackend>);
    if directory.is_none() {
        tracing::warn!("directory integration unconfigured; /api/nac routes answer 204");
    }

    let app = build_router(AppState { directory });

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
