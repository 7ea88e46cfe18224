//! Authentication session types

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use crate::errors::JournalError;
use crate::impl_domain_state_conversions;

/// Lifecycle of the client's authentication session.
///
/// ```text
/// Unauthenticated ──► Authenticating ──► Authenticated
///        ▲                   │
///        │                   └─────────► Failed
///        └──── provider state change ◄──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed,
}

impl_domain_state_conversions!(SessionState {
    Unauthenticated => "unauthenticated",
    Authenticating => "authenticating",
    Authenticated => "authenticated",
    Failed => "failed",
});

/// Snapshot of the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub state: SessionState,
    pub identity: Option<Identity>,
    pub error: Option<JournalError>,
    /// Set once identity resolution has settled, successfully or not.
    /// Presentation uses it to leave the "authenticating" screen.
    pub ready: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self { state: SessionState::Unauthenticated, identity: None, error: None, ready: false }
    }
}

impl Session {
    pub fn authenticating(&self) -> Self {
        Self { state: SessionState::Authenticating, identity: None, error: None, ready: self.ready }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            state: SessionState::Authenticated,
            identity: Some(identity),
            error: None,
            ready: true,
        }
    }

    pub fn failed(error: JournalError) -> Self {
        Self { state: SessionState::Failed, identity: None, error: Some(error), ready: true }
    }

    /// Signed-out state after the provider reported that the identity went
    /// away. Readiness is kept so presentation does not fall back to a
    /// loading screen.
    pub fn signed_out(&self) -> Self {
        Self { state: SessionState::Unauthenticated, identity: None, error: None, ready: self.ready }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated && self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<&super::identity::UserId> {
        self.identity.as_ref().map(|identity| &identity.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::identity::UserId;

    #[test]
    fn default_session_is_unauthenticated_and_not_ready() {
        let session = Session::default();
        assert_eq!(session.state, SessionState::Unauthenticated);
        assert!(!session.ready);
        assert!(session.user_id().is_none());
    }

    #[test]
    fn failed_session_is_ready_without_identity() {
        let session = Session::failed(JournalError::Authentication("denied".into()));
        assert_eq!(session.state, SessionState::Failed);
        assert!(session.ready);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn signed_out_keeps_readiness() {
        let session = Session::authenticated(Identity::anonymous(UserId::new("u")));
        let signed_out = session.signed_out();
        assert_eq!(signed_out.state, SessionState::Unauthenticated);
        assert!(signed_out.ready);
        assert!(signed_out.identity.is_none());
    }

    #[test]
    fn state_labels_round_trip() {
        for state in [
            SessionState::Unauthenticated,
            SessionState::Authenticating,
            SessionState::Authenticated,
            SessionState::Failed,
        ] {
            assert_eq!(state.to_string().parse::<SessionState>(), Ok(state));
        }
    }
}
