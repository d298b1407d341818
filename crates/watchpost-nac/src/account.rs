//! Account lifecycle
//!
//! Account activation against the directory control plane. Activation
//! is typically gated on an out-of-band operator approval of unbounded
//! duration, so a PENDING answer is normal; the caller decides whether
//! and when to poll again. This module never loops.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NacError, Result};
use crate::transport::{BasicAuth, Method, Transport};

/// Directory account state, authoritative at call time only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountState {
    /// Awaiting operator approval.
    Pending,
    /// Approved; data-plane calls are permitted.
    Enabled,
    /// Rejected. Terminal for this process.
    Disabled,
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountState::Pending => write!(f, "PENDING"),
            AccountState::Enabled => write!(f, "ENABLED"),
            AccountState::Disabled => write!(f, "DISABLED"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateResponse {
    account_state: AccountState,
}

/// Call `AccountActivate` exactly once and return the reported state.
pub(crate) fn activate(
    transport: &dyn Transport,
    url: &str,
    auth: &BasicAuth,
) -> Result<AccountState> {
    let response = transport.send(Method::POST, url, Some(&serde_json::json!({})), auth)?;
    if response.status != 200 {
        return Err(NacError::Communication(format!(
            "AccountActivate returned status {}",
            response.status
        )));
    }
    let parsed: ActivateResponse = serde_json::from_slice(&response.body)
        .map_err(|e| NacError::Communication(format!("malformed AccountActivate response: {e}")))?;
    Ok(parsed.account_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_state_wire_form_is_screaming_case() {
        let state: AccountState = serde_json::from_str("\"PENDING\"").unwrap();
        assert_eq!(state, AccountState::Pending);
        assert_eq!(serde_json::to_string(&AccountState::Enabled).unwrap(), "\"ENABLED\"");
    }

    #[test]
    fn unknown_state_is_a_parse_error() {
        assert!(serde_json::from_str::<AccountState>("\"RETIRED\"").is_err());
    }
}
