//! Transport layer
//!
//! Mutual-TLS HTTP transport bound to the client certificate/key pair,
//! with basic auth layered per call. The transport never errors on
//! ordinary HTTP status codes; it errors only on transport failures
//! (DNS, TLS handshake, connection refused, timeout). Status handling
//! is the caller's business.

use std::fs;

use crate::config::NacConfig;
use crate::error::{NacError, Result};

pub use reqwest::Method;

/// Basic-auth credentials for one call.
#[derive(Clone, Debug)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// Raw outcome of one HTTP exchange.
#[derive(Clone, Debug)]
pub struct WireResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// One HTTP exchange against the directory.
pub trait Transport: Send + Sync {
    /// Send `body` (if any) to `url` and return status plus body bytes.
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        auth: &BasicAuth,
    ) -> Result<WireResponse>;
}

/// Blocking reqwest transport configured for mutual TLS.
pub struct TlsTransport {
    client: reqwest::blocking::Client,
}

impl TlsTransport {
    /// Build a transport from the client configuration, loading the
    /// PEM certificate and key from disk.
    pub fn new(config: &NacConfig) -> Result<Self> {
        let identity = config.identity.clone();
        let mut pem = fs::read(&identity.certificate_path).map_err(|e| {
            NacError::Configuration(format!(
                "cannot read client certificate {}: {e}",
                identity.certificate_path.display()
            ))
        })?;
        let key = fs::read(&identity.private_key_path).map_err(|e| {
            NacError::Configuration(format!(
                "cannot read private key {}: {e}",
                identity.private_key_path.display()
            ))
        })?;
        pem.extend_from_slice(&key);

        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| NacError::Configuration(format!("unusable client identity: {e}")))?;

        let client = reqwest::blocking::Client::builder()
            .use_rustls_tls()
            .identity(identity)
            // Self-signed deployment certificates are the norm for
            // these appliances; verification is an explicit opt-in.
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for TlsTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        auth: &BasicAuth,
    ) -> Result<WireResponse> {
        let mut request = self
            .client
            .request(method, url)
            .basic_auth(&auth.username, Some(&auth.password));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        tracing::debug!(url, status, "directory exchange");
        Ok(WireResponse { status, body })
    }
}
