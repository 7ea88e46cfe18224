//! Port interfaces for identity resolution

use async_trait::async_trait;
use echo_domain::{BootstrapCredential, Identity, ProviderKind, Result};

use crate::subscription::Subscription;

/// External identity provider.
///
/// Every subscription first receives the provider's current identity (or
/// `None`) and then one item per change, including changes caused by the
/// sign-in calls below.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Watch identity changes until the subscription is cancelled.
    fn subscribe(&self) -> Subscription<Option<Identity>>;

    /// Create or restore an anonymous identity.
    async fn sign_in_anonymous(&self) -> Result<Identity>;

    /// Sign in with a pre-issued token.
    async fn sign_in_with_credential(&self, credential: &BootstrapCredential) -> Result<Identity>;

    /// User-driven sign-in with an external provider.
    async fn sign_in_interactive(&self, provider: ProviderKind) -> Result<Identity>;
}
