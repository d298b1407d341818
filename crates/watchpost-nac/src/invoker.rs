//! Directory REST invoker
//!
//! Issues one authenticated data-plane call against a resolved
//! endpoint. The URL is the exact concatenation of the descriptor's
//! REST base URL and the endpoint suffix; no trailing-slash
//! normalization is applied. HTTP 200 with a well-formed, non-empty
//! JSON body parses to a value; every other outcome (non-200 status,
//! empty body, malformed JSON) collapses to "no result". Only
//! transport-level connectivity failures propagate as errors.

use crate::error::Result;
use crate::resolver::ServiceDescriptor;
use crate::transport::{BasicAuth, Method, Transport};

/// POST `request_body` to `restBaseUrl + endpoint_suffix`.
///
/// `Ok(None)` covers both "nothing found" and "service rejected the
/// call"; splitting the two is a known future improvement, not a
/// behavior of this layer.
pub(crate) fn invoke(
    transport: &dyn Transport,
    descriptor: &ServiceDescriptor,
    auth: &BasicAuth,
    endpoint_suffix: &str,
    request_body: &serde_json::Value,
) -> Result<Option<serde_json::Value>> {
    let Some(base_url) = descriptor.rest_base_url() else {
        tracing::warn!(
            service = %descriptor.name,
            node = %descriptor.node_name,
            "descriptor advertises no restBaseUrl"
        );
        return Ok(None);
    };

    let url = format!("{base_url}{endpoint_suffix}");
    let response = transport.send(Method::POST, &url, Some(request_body), auth)?;

    if response.status != 200 {
        tracing::debug!(url = %url, status = response.status, "data-plane call yielded no result");
        return Ok(None);
    }
    if response.body.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_slice(&response.body).ok())
}
