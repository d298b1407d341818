//! Access-control directory endpoints
//!
//! Session lookup and policy enforcement, backed by the directory's
//! discovered data-plane services. Every handler builds a fresh
//! directory client, so concurrently handled requests never share
//! mutable state; the whole blocking sequence (activate, lookup,
//! secret, invoke) runs on the blocking thread pool.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use watchpost_nac::NacError;

use crate::error::ApiError;
use crate::AppState;

/// Capability advertised by session-lookup services.
const CAPABILITY_SESSION: &str = "com.example.session";
/// Capability advertised by policy-enforcement services.
const CAPABILITY_POLICY: &str = "com.example.policy";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/session/:ip", get(get_session))
        .route("/endpoint/policy", post(apply_policy))
        .route(
            "/endpoint/:mac/policy",
            get(get_policy).delete(clear_policy),
        )
}

/// Session data for an IP address.
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
) -> Result<Response, ApiError> {
    directory_call(
        &state,
        CAPABILITY_SESSION,
        "/getSessionByIpAddress",
        serde_json::json!({ "ipAddress": ip }),
    )
    .await
}

/// Current policy assignment for a MAC address.
async fn get_policy(
    State(state): State<Arc<AppState>>,
    Path(mac): Path<String>,
) -> Result<Response, ApiError> {
    directory_call(
        &state,
        CAPABILITY_POLICY,
        "/getEndpointByMacAddress",
        serde_json::json!({ "macAddress": mac }),
    )
    .await
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplyPolicyRequest {
    mac_address: String,
    policy_name: String,
}

/// Apply a policy to a MAC address.
async fn apply_policy(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ApplyPolicyRequest>,
) -> Result<Response, ApiError> {
    directory_call(
        &state,
        CAPABILITY_POLICY,
        "/applyEndpointByMacAddress",
        serde_json::json!({
            "macAddress": request.mac_address,
            "policyName": request.policy_name,
        }),
    )
    .await
}

/// Clear the policy assignment for a MAC address.
async fn clear_policy(
    State(state): State<Arc<AppState>>,
    Path(mac): Path<String>,
) -> Result<Response, ApiError> {
    directory_call(
        &state,
        CAPABILITY_POLICY,
        "/clearEndpointByMacAddress",
        serde_json::json!({ "macAddress": mac }),
    )
    .await
}

/// One full directory round trip for one inbound request.
///
/// Unconfigured integration answers 204 before any client exists. A
/// not-enabled account answers 403. `Ok(None)` from the data plane is
/// the 204 "nothing to return" case, distinct from failure.
async fn directory_call(
    state: &AppState,
    capability: &'static str,
    endpoint_suffix: &'static str,
    request_body: serde_json::Value,
) -> Result<Response, ApiError> {
    let Some(backend) = state.directory.clone() else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let outcome = tokio::task::spawn_blocking(move || {
        backend.call(capability, endpoint_suffix, &request_body)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "directory worker task failed");
        ApiError::Internal
    })?;

    directory_response(capability, outcome)
}

/// Map a directory outcome onto the gateway's HTTP contract: a value
/// passes through as 200, "nothing to return" is an empty 204, and
/// failures go through [`ApiError`].
fn directory_response(
    capability: &str,
    outcome: Result<Option<serde_json::Value>, NacError>,
) -> Result<Response, ApiError> {
    match outcome {
        Ok(Some(value)) => Ok(Json(value).into_response()),
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err) => {
            tracing::warn!(capability, error = %err, "directory call failed");
            Err(err.into())
        }
    }
}
