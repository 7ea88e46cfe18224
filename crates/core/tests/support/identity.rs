//! Mock identity provider

use std::collections::VecDeque;

use async_trait::async_trait;
use echo_core::subscription::{self, Subscription, SubscriptionSink};
use echo_core::IdentityProvider;
use echo_domain::{BootstrapCredential, Identity, JournalError, ProviderKind, Result, UserId};
use parking_lot::Mutex;

/// Identity provider with scripted sign-in outcomes.
///
/// Starts signed out. Successful sign-ins update the current identity and
/// notify subscribers, like a real provider would.
#[derive(Default)]
pub struct MockIdentityProvider {
    current: Mutex<Option<Identity>>,
    sinks: Mutex<Vec<SubscriptionSink<Option<Identity>>>>,
    anonymous: Mutex<VecDeque<Result<Identity>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome of the next anonymous sign-in.
    pub fn with_anonymous(self, outcome: Result<Identity>) -> Self {
        self.anonymous.lock().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.lock().iter().filter(|sink| !sink.is_closed()).count()
    }

    /// Simulate an external sign-out.
    pub fn sign_out(&self) {
        self.set(None);
    }

    fn set(&self, identity: Option<Identity>) {
        *self.current.lock() = identity.clone();
        self.sinks.lock().retain(|sink| sink.emit(identity.clone()));
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    fn subscribe(&self) -> Subscription<Option<Identity>> {
        let (sink, subscription) = subscription::channel();
        sink.emit(self.current.lock().clone());
        self.sinks.lock().push(sink);
        subscription
    }

    async fn sign_in_anonymous(&self) -> Result<Identity> {
        self.calls.lock().push("anonymous");
        let outcome = self
            .anonymous
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Identity::anonymous(UserId::new("anon-user"))));
        if let Ok(identity) = &outcome {
            self.set(Some(identity.clone()));
        }
        outcome
    }

    async fn sign_in_with_credential(&self, credential: &BootstrapCredential) -> Result<Identity> {
        self.calls.lock().push("credential");
        if credential.expose().is_empty() {
            return Err(JournalError::Authentication("empty token".into()));
        }
        let identity = Identity::with_credential(UserId::new("token-user"));
        self.set(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in_interactive(&self, provider: ProviderKind) -> Result<Identity> {
        self.calls.lock().push("interactive");
        let identity = Identity::with_provider(UserId::new("google-user"), provider);
        self.set(Some(identity.clone()));
        Ok(identity)
    }
}
