//! Error taxonomy
//!
//! Three failure kinds, kept strictly apart: configuration problems
//! caught before any network call, transport-level communication
//! failures, and precondition violations (data-plane work attempted
//! while the account is not enabled). "Nothing to return" is not an
//! error anywhere in this crate; the invoker expresses it as
//! `Ok(None)`.

use crate::account::AccountState;

/// Errors surfaced by the directory client.
#[derive(Debug, thiserror::Error)]
pub enum NacError {
    /// Missing or unusable credentials, certificates or settings,
    /// detected before any network call is attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport failure (DNS, TLS handshake, connection refused,
    /// timeout) or a malformed control-plane response. Surfaces
    /// unmodified; retry policy belongs to the caller.
    #[error("communication error: {0}")]
    Communication(String),

    /// A data-plane call was attempted while the account was not
    /// enabled. No network call was made.
    #[error("directory account not enabled (state: {0})")]
    Precondition(AccountState),
}

impl From<reqwest::Error> for NacError {
    fn from(err: reqwest::Error) -> Self {
        NacError::Communication(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NacError>;
