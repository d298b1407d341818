//! WatchPost Access-Control Directory Client
//!
//! Client for the network-access-control directory's service-discovery
//! protocol. Unlike the gateway's other upstreams, the directory cannot
//! be reached with one static URL and credential: the client
//! authenticates with a certificate over mutual TLS, waits for its
//! account to leave the pending state, discovers the endpoint and a
//! short-lived access secret for the capability it needs, and only then
//! issues the data-plane call.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       NacClient                         │
//! │                                                         │
//! │  control plane (node name + password)                   │
//! │    AccountActivate ──> PENDING | ENABLED | DISABLED     │
//! │    ServiceLookup   ──> [ServiceDescriptor]              │
//! │    AccessSecret    ──> per-peer secret                  │
//! │                                                         │
//! │  data plane (node name + access secret)                 │
//! │    POST restBaseUrl + suffix ──> JSON value | nothing   │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every call is blocking. Each inbound gateway request constructs its
//! own [`NacClient`] and runs activation, lookup, secret and invoke
//! sequentially; instances never share mutable state, so there is no
//! locking anywhere in this crate.

pub mod account;
pub mod client;
pub mod config;
pub mod error;
pub mod invoker;
pub mod resolver;
pub mod transport;

pub use account::AccountState;
pub use client::NacClient;
pub use config::{ClientIdentity, NacConfig};
pub use error::{NacError, Result};
pub use resolver::{AccessSecret, ServiceDescriptor};
pub use transport::{BasicAuth, Transport, WireResponse};
