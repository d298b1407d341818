//! Gateway error responses
//!
//! Maps directory client failures onto the gateway's HTTP contract.
//! Detail stays in the logs; response bodies are opaque by design so
//! credentials and raw upstream failure text never reach HTTP clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use watchpost_nac::NacError;

/// Client-visible failure categories.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The directory account is not enabled for this gateway.
    #[error("directory account not enabled")]
    Forbidden,

    /// The upstream could not be reached or answered garbage.
    #[error("upstream communication failure")]
    Upstream,

    /// Anything the gateway itself got wrong.
    #[error("internal error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: &'static str,
}

impl From<NacError> for ApiError {
    fn from(err: NacError) -> Self {
        match err {
            NacError::Precondition(_) => ApiError::Forbidden,
            NacError::Communication(_) => ApiError::Upstream,
            NacError::Configuration(_) => ApiError::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Empty body, matching the gateway's 403 contract.
            ApiError::Forbidden => StatusCode::FORBIDDEN.into_response(),
            ApiError::Upstream => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    status: "error",
                    message: "upstream communication failure",
                }),
            )
                .into_response(),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    status: "error",
                    message: "internal error",
                }),
            )
                .into_response(),
        }
    }
}
