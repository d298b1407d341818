//! Client configuration
//!
//! Typed configuration for the directory client, loaded from
//! environment variables. The integration is optional: when none of
//! the identity variables are set, `NacConfig::from_env` returns
//! `Ok(None)` and the gateway treats the directory as unconfigured.
//! A partial set of variables is a configuration error.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NacError, Result};

/// Certificate-based client identity, immutable once constructed.
#[derive(Clone, Debug)]
pub struct ClientIdentity {
    /// Node name this client registers and authenticates as.
    pub node_name: String,
    /// PEM client certificate path.
    pub certificate_path: PathBuf,
    /// PEM private key path.
    pub private_key_path: PathBuf,
}

/// Directory client settings for one gateway deployment.
#[derive(Clone, Debug)]
pub struct NacConfig {
    /// Directory host, optionally with port (e.g. `10.0.0.1:8910`).
    pub host: String,
    /// Client identity used for mutual TLS and basic auth.
    pub identity: ClientIdentity,
    /// Control-plane password. Empty for certificate-authenticated
    /// deployments, which is the common case.
    pub node_password: String,
    /// Verify the directory's certificate and hostname. Off by default
    /// to tolerate the self-signed certificates these appliances ship
    /// with; turn on where a real PKI is in place.
    pub verify_tls: bool,
    /// Bound applied to every blocking network call.
    pub timeout: Duration,
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl NacConfig {
    /// Load the directory configuration from the environment.
    ///
    /// Returns `Ok(None)` when the integration is entirely
    /// unconfigured, `Err(Configuration)` when it is half-configured.
    pub fn from_env() -> Result<Option<Self>> {
        let host = env_opt("WATCHPOST_NAC_HOST");
        let node_name = env_opt("WATCHPOST_NAC_NODE_NAME");
        let certificate = env_opt("WATCHPOST_NAC_CERT_PATH");
        let private_key = env_opt("WATCHPOST_NAC_KEY_PATH");

        if host.is_none() && node_name.is_none() && certificate.is_none() && private_key.is_none()
        {
            return Ok(None);
        }

        let timeout_secs = match env_opt("WATCHPOST_NAC_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                NacError::Configuration(format!(
                    "WATCHPOST_NAC_TIMEOUT_SECS is not a number: {raw}"
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Some(Self {
            host: required(host, "WATCHPOST_NAC_HOST")?,
            identity: ClientIdentity {
                node_name: required(node_name, "WATCHPOST_NAC_NODE_NAME")?,
                certificate_path: required(certificate, "WATCHPOST_NAC_CERT_PATH")?.into(),
                private_key_path: required(private_key, "WATCHPOST_NAC_KEY_PATH")?.into(),
            },
            node_password: env_opt("WATCHPOST_NAC_NODE_PASSWORD").unwrap_or_default(),
            verify_tls: env_opt("WATCHPOST_NAC_VERIFY_TLS")
                .map(|v| v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            timeout: Duration::from_secs(timeout_secs),
        }))
    }

    /// Full URL of a control-plane operation.
    pub fn control_url(&self, operation: &str) -> String {
        format!("https://{}/control/{}", self.host, operation)
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| NacError::Configuration(format!("{name} is not set")))
}
