//! Service directory resolver
//!
//! Resolves a capability name to the services currently advertising
//! it, and fetches the short-lived access secret for one peer node.
//! Descriptors are produced fresh per lookup and never cached: the
//! directory may relocate or rotate services between calls. Likewise a
//! secret is fetched per data-plane request and discarded after one
//! use, trading latency for the elimination of staleness bugs.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NacError, Result};
use crate::transport::{BasicAuth, Method, Transport};

/// Property key under which a service advertises its REST base URL.
pub const PROP_REST_BASE_URL: &str = "restBaseUrl";

/// One service advertising a capability.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Capability name the service advertises.
    pub name: String,
    /// Directory node the service runs on.
    pub node_name: String,
    /// Service properties, including the REST base URL.
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl ServiceDescriptor {
    /// The advertised REST base URL, if the service carries one.
    pub fn rest_base_url(&self) -> Option<&str> {
        self.properties.get(PROP_REST_BASE_URL).map(String::as_str)
    }
}

/// Short-lived credential scoped to one (requesting node, target node)
/// pair. Obtained lazily, used for exactly one data-plane call.
#[derive(Clone, Deserialize)]
pub struct AccessSecret {
    secret: String,
}

impl AccessSecret {
    /// The secret value, for use as a basic-auth password.
    pub fn reveal(&self) -> &str {
        &self.secret
    }
}

// Keep the secret out of logs and error text.
impl fmt::Debug for AccessSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessSecret(..)")
    }
}

#[derive(Serialize)]
struct ServiceLookupRequest<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct ServiceLookupResponse {
    #[serde(default)]
    services: Vec<ServiceDescriptor>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessSecretRequest<'a> {
    peer_node_name: &'a str,
}

/// Resolve `capability` to the full directory-ordered descriptor list.
/// An empty list is a normal answer: the capability is currently
/// unavailable.
pub(crate) fn lookup(
    transport: &dyn Transport,
    url: &str,
    auth: &BasicAuth,
    capability: &str,
) -> Result<Vec<ServiceDescriptor>> {
    let request = serde_json::to_value(ServiceLookupRequest { name: capability })
        .map_err(|e| NacError::Communication(e.to_string()))?;
    let response = transport.send(Method::POST, url, Some(&request), auth)?;
    if response.status != 200 {
        return Err(NacError::Communication(format!(
            "ServiceLookup returned status {}",
            response.status
        )));
    }
    let parsed: ServiceLookupResponse = serde_json::from_slice(&response.body)
        .map_err(|e| NacError::Communication(format!("malformed ServiceLookup response: {e}")))?;
    tracing::debug!(capability, services = parsed.services.len(), "capability resolved");
    Ok(parsed.services)
}

/// Fetch a fresh access secret for calls from this node to `peer`.
pub(crate) fn access_secret(
    transport: &dyn Transport,
    url: &str,
    auth: &BasicAuth,
    peer_node_name: &str,
) -> Result<AccessSecret> {
    let request = serde_json::to_value(AccessSecretRequest { peer_node_name })
        .map_err(|e| NacError::Communication(e.to_string()))?;
    let response = transport.send(Method::POST, url, Some(&request), auth)?;
    if response.status != 200 {
        return Err(NacError::Communication(format!(
            "AccessSecret returned status {}",
            response.status
        )));
    }
    serde_json::from_slice(&response.body)
        .map_err(|e| NacError::Communication(format!("malformed AccessSecret response: {e}")))
}
