use std::collections::HashMap;

use async_trait::async_trait;
use echo_core::subscription::{self, Subscription, SubscriptionSink};
use echo_core::IdentityProvider;
use echo_domain::{BootstrapCredential, Identity, JournalError, ProviderKind, Result, UserId};
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Sign-in methods that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Method {
    Anonymous,
    Credential,
    Interactive,
}

/// Identity provider that mints identities locally.
///
/// Anonymous sign-in issues a fresh user id. A bootstrap credential maps to
/// the same user id every time it is presented. Interactive sign-in
/// completes immediately for the requested provider.
#[derive(Default)]
pub struct LocalIdentityProvider {
    current: Mutex<Option<Identity>>,
    sinks: Mutex<Vec<SubscriptionSink<Option<Identity>>>>,
    credentials: Mutex<HashMap<String, UserId>>,
    disabled: Mutex<HashMap<Method, String>>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already holds `identity`, as if restored from a
    /// previous run.
    pub fn restored(identity: Identity) -> Self {
        let provider = Self::default();
        *provider.current.lock() = Some(identity);
        provider
    }

    /// Fail anonymous sign-in with `reason`.
    pub fn disable_anonymous(&self, reason: impl Into<String>) {
        self.disabled.lock().insert(Method::Anonymous, reason.into());
    }

    /// Fail credential sign-in with `reason`.
    pub fn disable_credentials(&self, reason: impl Into<String>) {
        self.disabled.lock().insert(Method::Credential, reason.into());
    }

    /// Fail interactive sign-in with `reason`.
    pub fn disable_interactive(&self, reason: impl Into<String>) {
        self.disabled.lock().insert(Method::Interactive, reason.into());
    }

    pub fn current(&self) -> Option<Identity> {
        self.current.lock().clone()
    }

    /// Drop the current identity and notify subscribers.
    pub fn sign_out(&self) {
        info!("local identity signed out");
        self.publish(None);
    }

    pub fn subscriber_count(&self) -> usize {
        let mut sinks = self.sinks.lock();
        sinks.retain(|sink| !sink.is_closed());
        sinks.len()
    }

    fn check(&self, method: Method) -> Result<()> {
        match self.disabled.lock().get(&method) {
            Some(reason) => Err(JournalError::Authentication(reason.clone())),
            None => Ok(()),
        }
    }

    fn publish(&self, identity: Option<Identity>) {
        *self.current.lock() = identity.clone();
        self.sinks.lock().retain(|sink| sink.emit(identity.clone()));
    }

    fn signed_in(&self, identity: Identity) -> Identity {
        debug!(user_id = %identity.user_id, anonymous = identity.anonymous, "local identity issued");
        self.publish(Some(identity.clone()));
        identity
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self) -> Subscription<Option<Identity>> {
        let (sink, subscription) = subscription::channel();
        sink.emit(self.current());
        self.sinks.lock().push(sink);
        subscription
    }

    async fn sign_in_anonymous(&self) -> Result<Identity> {
        self.check(Method::Anonymous)?;
        let user_id = UserId::new(Uuid::new_v4().simple().to_string());
        Ok(self.signed_in(Identity::anonymous(user_id)))
    }

    async fn sign_in_with_credential(&self, credential: &BootstrapCredential) -> Result<Identity> {
        self.check(Method::Credential)?;
        if credential.expose().trim().is_empty() {
            return Err(JournalError::Authentication("invalid custom token".into()));
        }
        let user_id = self
            .credentials
            .lock()
            .entry(credential.expose().to_string())
            .or_insert_with(|| UserId::new(Uuid::new_v4().simple().to_string()))
            .clone();
        Ok(self.signed_in(Identity::with_credential(user_id)))
    }

    async fn sign_in_interactive(&self, provider: ProviderKind) -> Result<Identity> {
        self.check(Method::Interactive)?;
        let user_id = UserId::new(format!("{provider}-{}", Uuid::new_v4().simple()));
        Ok(self.signed_in(Identity::with_provider(user_id, provider)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribe_delivers_current_identity_first() {
        let restored = Identity::anonymous(UserId::new("u-restored"));
        let provider = LocalIdentityProvider::restored(restored.clone());

        let mut sub = provider.subscribe();

        assert_eq!(sub.next().await, Some(Some(restored)));
    }

    #[tokio::test]
    async fn sign_in_notifies_subscribers() {
        let provider = LocalIdentityProvider::new();
        let mut sub = provider.subscribe();
        assert_eq!(sub.next().await, Some(None));

        let identity = provider.sign_in_anonymous().await.expect("sign in");

        assert!(identity.anonymous);
        assert_eq!(sub.next().await, Some(Some(identity)));
    }

    #[tokio::test]
    async fn same_credential_same_user() {
        let provider = LocalIdentityProvider::new();
        let token = BootstrapCredential::new("token-a");

        let first = provider.sign_in_with_credential(&token).await.expect("sign in");
        let second = provider.sign_in_with_credential(&token).await.expect("sign in");
        let other = provider
            .sign_in_with_credential(&BootstrapCredential::new("token-b"))
            .await
            .expect("sign in");

        assert!(!first.anonymous);
        assert_eq!(first.user_id, second.user_id);
        assert_ne!(first.user_id, other.user_id);
    }

    #[tokio::test]
    async fn blank_credential_rejected() {
        let provider = LocalIdentityProvider::new();
        let err = provider.sign_in_with_credential(&BootstrapCredential::new("  ")).await;
        assert!(matches!(err, Err(JournalError::Authentication(_))));
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn interactive_sign_in_records_provider() {
        let provider = LocalIdentityProvider::new();
        let identity = provider.sign_in_interactive(ProviderKind::Google).await.expect("sign in");

        assert_eq!(identity.provider, Some(ProviderKind::Google));
        assert!(identity.user_id.as_str().starts_with("google-"));
    }

    #[tokio::test]
    async fn disabled_method_fails_without_changing_identity() {
        let provider = LocalIdentityProvider::new();
        provider.disable_anonymous("operation not allowed");

        let err = provider.sign_in_anonymous().await.unwrap_err();

        assert_eq!(err, JournalError::Authentication("operation not allowed".into()));
        assert!(provider.current().is_none());
    }

    #[tokio::test]
    async fn sign_out_publishes_none_and_drops_cancelled_sinks() {
        let provider = LocalIdentityProvider::new();
        let mut live = provider.subscribe();
        let gone = provider.subscribe();
        live.next().await;
        gone.cancel();

        provider.sign_in_anonymous().await.expect("sign in");
        provider.sign_out();

        assert!(matches!(live.next().await, Some(Some(_))));
        assert_eq!(live.next().await, Some(None));
        assert_eq!(provider.subscriber_count(), 1);
    }
}
