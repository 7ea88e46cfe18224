//! Identity types
//!
//! Identities are issued by the external identity provider; the client only
//! ever sees the opaque user id and whether the identity is anonymous.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::impl_domain_state_conversions;

/// Opaque, provider-assigned user id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interactive sign-in providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Google,
}

impl_domain_state_conversions!(ProviderKind {
    Google => "google",
});

/// A resolved identity as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub anonymous: bool,
    /// Provider that backs the identity, `None` for anonymous and
    /// credential sign-ins.
    pub provider: Option<ProviderKind>,
}

impl Identity {
    pub fn anonymous(user_id: UserId) -> Self {
        Self { user_id, anonymous: true, provider: None }
    }

    pub fn with_credential(user_id: UserId) -> Self {
        Self { user_id, anonymous: false, provider: None }
    }

    pub fn with_provider(user_id: UserId, provider: ProviderKind) -> Self {
        Self { user_id, anonymous: false, provider: Some(provider) }
    }
}

/// Pre-issued sign-in token supplied at startup.
///
/// The token never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BootstrapCredential(String);

impl BootstrapCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Expose the raw token to the identity provider.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BootstrapCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BootstrapCredential(<redacted>)")
    }
}
