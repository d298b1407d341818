//! Directory backend
//!
//! The gateway's seam to the access-control directory. Handlers talk
//! to the trait, the binary plugs in the real per-request client, and
//! router tests plug in a stub. The trait is blocking by design: the
//! whole directory sequence runs on the blocking thread pool.

use serde_json::Value;
use watchpost_nac::{AccountState, NacClient, NacConfig, NacError};

/// One full blocking directory round trip for one inbound request.
pub trait DirectoryBackend: Send + Sync {
    /// Activate, resolve the capability and invoke the data plane.
    /// `Ok(None)` means "nothing to return", never failure.
    fn call(
        &self,
        capability: &str,
        endpoint_suffix: &str,
        request_body: &Value,
    ) -> Result<Option<Value>, NacError>;
}

/// Production backend: a fresh `NacClient` per call, so concurrently
/// handled requests never share mutable state.
pub struct NacDirectory {
    config: NacConfig,
}

impl NacDirectory {
    pub fn new(config: NacConfig) -> Self {
        Self { config }
    }
}

impl DirectoryBackend for NacDirectory {
    fn call(
        &self,
        capability: &str,
        endpoint_suffix: &str,
        request_body: &Value,
    ) -> Result<Option<Value>, NacError> {
        let mut client = NacClient::connect(self.config.clone())?;
        let account = client.activate()?;
        if account != AccountState::Enabled {
            return Err(NacError::Precondition(account));
        }
        client.call(capability, endpoint_suffix, request_body)
    }
}
