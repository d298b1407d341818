//! WatchPost Aggregation Gateway
//!
//! Unified JSON API over independently operated security-telemetry
//! back ends. The routes carried here are the ones backed by the
//! network-access-control directory, which needs the full
//! control-plane dance (mutual TLS, activation, capability lookup,
//! per-call secrets) implemented in `watchpost-nac`; back ends that
//! only need routine request translation are integrated elsewhere.
//!
//! Gateway conventions: HTTP 204 with an empty body when an upstream
//! integration is unconfigured or returned nothing, HTTP 403 when the
//! directory account is not enabled, and opaque error bodies. Raw
//! upstream text and credentials never reach HTTP clients.

pub mod directory;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use directory::{DirectoryBackend, NacDirectory};

/// Shared, read-only gateway state.
pub struct AppState {
    /// Directory backend; `None` means the integration is
    /// unconfigured and its routes answer 204.
    pub directory: Option<Arc<dyn DirectoryBackend>>,
}

/// Assemble the gateway router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/nac", routes::nac::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(Arc::new(state))
}
