//! Client facade
//!
//! One `NacClient` per inbound gateway request. The client owns its
//! transport and its view of the account state, and runs activation,
//! lookup, secret and invoke strictly in that order. Enabled and
//! disabled are terminal for the process; only a pending account is
//! re-polled, and only when the caller asks.

use crate::account::{self, AccountState};
use crate::config::NacConfig;
use crate::error::{NacError, Result};
use crate::invoker;
use crate::resolver::{self, AccessSecret, ServiceDescriptor};
use crate::transport::{BasicAuth, TlsTransport, Transport};

/// Per-request directory client.
pub struct NacClient {
    config: NacConfig,
    transport: Box<dyn Transport>,
    state: AccountState,
}

impl NacClient {
    /// Build a client over a mutual-TLS transport bound to the
    /// configured certificate/key pair.
    pub fn connect(config: NacConfig) -> Result<Self> {
        let transport = TlsTransport::new(&config)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Build a client over an injected transport. This is the seam the
    /// tests use; production code goes through [`NacClient::connect`].
    pub fn with_transport(config: NacConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            state: AccountState::Pending,
        }
    }

    /// The account state as of the last activation call.
    pub fn account_state(&self) -> AccountState {
        self.state
    }

    /// Poll the activation endpoint once and return the authoritative
    /// state. A pending answer is normal (activation is an out-of-band
    /// operator approval); re-polling is the caller's decision. Once
    /// the account is enabled or disabled the state is terminal and no
    /// further network call is made.
    pub fn activate(&mut self) -> Result<AccountState> {
        if self.state != AccountState::Pending {
            return Ok(self.state);
        }
        let state = account::activate(
            self.transport.as_ref(),
            &self.config.control_url("AccountActivate"),
            &self.control_auth(),
        )?;
        tracing::info!(node = %self.config.identity.node_name, %state, "account activation polled");
        self.state = state;
        Ok(state)
    }

    /// Resolve a capability to the services currently advertising it,
    /// in directory-returned order. Empty means "currently
    /// unavailable", not failure. Requires an enabled account.
    pub fn lookup(&self, capability: &str) -> Result<Vec<ServiceDescriptor>> {
        self.require_enabled()?;
        resolver::lookup(
            self.transport.as_ref(),
            &self.config.control_url("ServiceLookup"),
            &self.control_auth(),
            capability,
        )
    }

    /// Fetch a fresh access secret scoped to (this node, the
    /// descriptor's node). Valid for one data-plane call.
    pub fn access_secret(&self, service: &ServiceDescriptor) -> Result<AccessSecret> {
        self.require_enabled()?;
        resolver::access_secret(
            self.transport.as_ref(),
            &self.config.control_url("AccessSecret"),
            &self.control_auth(),
            &service.node_name,
        )
    }

    /// Issue one data-plane call against a resolved service.
    pub fn invoke(
        &self,
        service: &ServiceDescriptor,
        endpoint_suffix: &str,
        request_body: &serde_json::Value,
        secret: &AccessSecret,
    ) -> Result<Option<serde_json::Value>> {
        self.require_enabled()?;
        let auth = BasicAuth {
            username: self.config.identity.node_name.clone(),
            password: secret.reveal().to_string(),
        };
        invoker::invoke(
            self.transport.as_ref(),
            service,
            &auth,
            endpoint_suffix,
            request_body,
        )
    }

    /// Full data-plane round trip: resolve the capability, take the
    /// first advertised service, fetch one fresh secret and invoke.
    /// No advertising service means `Ok(None)`.
    pub fn call(
        &self,
        capability: &str,
        endpoint_suffix: &str,
        request_body: &serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        let services = self.lookup(capability)?;
        let Some(service) = services.first() else {
            tracing::debug!(capability, "no service advertises capability");
            return Ok(None);
        };
        let secret = self.access_secret(service)?;
        self.invoke(service, endpoint_suffix, request_body, &secret)
    }

    fn require_enabled(&self) -> Result<()> {
        if self.state != AccountState::Enabled {
            return Err(NacError::Precondition(self.state));
        }
        Ok(())
    }

    fn control_auth(&self) -> BasicAuth {
        BasicAuth {
            username: self.config.identity.node_name.clone(),
            password: self.config.node_password.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::ClientIdentity;
    use crate::transport::mock::MockTransport;
    use crate::transport::WireResponse;

    fn config() -> NacConfig {
        NacConfig {
            host: "10.0.0.1:8910".into(),
            identity: ClientIdentity {
                node_name: "watchpost".into(),
                certificate_path: "/etc/watchpost/client.pem".into(),
                private_key_path: "/etc/watchpost/client.key".into(),
            },
            node_password: String::new(),
            verify_tls: false,
            timeout: Duration::from_secs(30),
        }
    }

    fn client(responses: Vec<crate::Result<WireResponse>>) -> (NacClient, std::sync::Arc<MockTransport>) {
        let transport = std::sync::Arc::new(MockTransport::new(responses));
        let client = NacClient::with_transport(config(), Box::new(ArcTransport(transport.clone())));
        (client, transport)
    }

    // Lets the test keep a handle on the transport the client owns.
    struct ArcTransport(std::sync::Arc<MockTransport>);

    impl Transport for ArcTransport {
        fn send(
            &self,
            method: crate::transport::Method,
            url: &str,
            body: Option<&serde_json::Value>,
            auth: &BasicAuth,
        ) -> crate::Result<WireResponse> {
            self.0.send(method, url, body, auth)
        }
    }

    const LOOKUP_ONE: &str = r#"{"services":[{"name":"com.example.session","nodeName":"nac-01","properties":{"restBaseUrl":"https://10.0.0.1:8910/session"}}]}"#;

    #[test]
    fn activation_pending_is_a_normal_answer() {
        let (mut client, transport) =
            client(vec![MockTransport::ok(200, r#"{"accountState":"PENDING"}"#)]);
        assert_eq!(client.activate().unwrap(), AccountState::Pending);
        assert_eq!(transport.call_count(), 1);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls[0].method, crate::transport::Method::POST);
        assert_eq!(
            calls[0].url,
            "https://10.0.0.1:8910/control/AccountActivate"
        );
    }

    #[test]
    fn activation_is_idempotent_once_enabled() {
        let (mut client, transport) =
            client(vec![MockTransport::ok(200, r#"{"accountState":"ENABLED"}"#)]);
        assert_eq!(client.activate().unwrap(), AccountState::Enabled);
        // Second call answers from the terminal state, no network.
        assert_eq!(client.activate().unwrap(), AccountState::Enabled);
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn malformed_activation_response_is_communication_error() {
        let (mut client, _) = client(vec![MockTransport::ok(200, "not json")]);
        assert!(matches!(
            client.activate(),
            Err(NacError::Communication(_))
        ));
    }

    #[test]
    fn lookup_before_enabled_makes_no_network_call() {
        let (client, transport) = client(vec![]);
        assert!(matches!(
            client.lookup("com.example.session"),
            Err(NacError::Precondition(AccountState::Pending))
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn disabled_account_fails_fast_on_data_plane() {
        let (mut client, transport) =
            client(vec![MockTransport::ok(200, r#"{"accountState":"DISABLED"}"#)]);
        assert_eq!(client.activate().unwrap(), AccountState::Disabled);
        assert!(matches!(
            client.call("com.example.session", "/getSessionByIpAddress", &serde_json::json!({})),
            Err(NacError::Precondition(AccountState::Disabled))
        ));
        // Only the activation call went out.
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn lookup_with_no_advertisers_is_empty_not_error() {
        let (mut client, _) = client(vec![
            MockTransport::ok(200, r#"{"accountState":"ENABLED"}"#),
            MockTransport::ok(200, r#"{"services":[]}"#),
        ]);
        client.activate().unwrap();
        let services = client.lookup("com.example.absent").unwrap();
        assert!(services.is_empty());
    }

    #[test]
    fn lookup_selects_descriptors_in_directory_order() {
        let (mut client, _) = client(vec![
            MockTransport::ok(200, r#"{"accountState":"ENABLED"}"#),
            MockTransport::ok(
                200,
                r#"{"services":[
                    {"name":"com.example.session","nodeName":"nac-01","properties":{"restBaseUrl":"https://10.0.0.1:8910/session"}},
                    {"name":"com.example.session","nodeName":"nac-02","properties":{"restBaseUrl":"https://10.0.0.2:8910/session"}}
                ]}"#,
            ),
        ]);
        client.activate().unwrap();
        let services = client.lookup("com.example.session").unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(
            services.first().unwrap().rest_base_url(),
            Some("https://10.0.0.1:8910/session")
        );
    }

    #[test]
    fn call_fetches_exactly_one_secret_per_invoke() {
        let (mut client, transport) = client(vec![
            MockTransport::ok(200, r#"{"accountState":"ENABLED"}"#),
            MockTransport::ok(200, LOOKUP_ONE),
            MockTransport::ok(200, r#"{"secret":"one-shot"}"#),
            MockTransport::ok(200, r#"{"sessions":[]}"#),
        ]);
        client.activate().unwrap();
        let result = client
            .call(
                "com.example.session",
                "/getSessionByIpAddress",
                &serde_json::json!({"ipAddress": "10.1.1.1"}),
            )
            .unwrap();
        assert_eq!(result, Some(serde_json::json!({"sessions": []})));

        let calls = transport.calls.lock().unwrap();
        let secret_calls = calls
            .iter()
            .filter(|c| c.url.ends_with("/control/AccessSecret"))
            .count();
        assert_eq!(secret_calls, 1);

        // The secret scopes to the descriptor's node and authenticates
        // the one data-plane call that follows.
        let secret_request = calls
            .iter()
            .find(|c| c.url.ends_with("/control/AccessSecret"))
            .unwrap();
        assert_eq!(
            secret_request.body,
            Some(serde_json::json!({"peerNodeName": "nac-01"}))
        );
        let data_call = calls.last().unwrap();
        assert_eq!(
            data_call.url,
            "https://10.0.0.1:8910/session/getSessionByIpAddress"
        );
        assert_eq!(data_call.username, "watchpost");
        assert_eq!(data_call.password, "one-shot");
    }

    #[test]
    fn call_with_no_advertiser_is_no_result_without_secret_fetch() {
        let (mut client, transport) = client(vec![
            MockTransport::ok(200, r#"{"accountState":"ENABLED"}"#),
            MockTransport::ok(200, r#"{"services":[]}"#),
        ]);
        client.activate().unwrap();
        let result = client
            .call(
                "com.example.session",
                "/getSessionByIpAddress",
                &serde_json::json!({"ipAddress": "10.1.1.1"}),
            )
            .unwrap();
        assert_eq!(result, None);
        // Activation plus lookup only; no secret, no data-plane call.
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn transport_failure_propagates_unmodified() {
        let (mut client, _) = client(vec![
            MockTransport::ok(200, r#"{"accountState":"ENABLED"}"#),
            Err(NacError::Communication("connection refused".into())),
        ]);
        client.activate().unwrap();
        match client.lookup("com.example.session") {
            Err(NacError::Communication(msg)) => assert_eq!(msg, "connection refused"),
            other => panic!("expected communication error, got {other:?}"),
        }
    }
}
