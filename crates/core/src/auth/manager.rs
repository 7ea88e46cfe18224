//! Authentication session manager
//!
//! Owns the client's [`Session`]. A background listener consumes identity
//! provider events one at a time:
//!
//! - `Some(identity)` moves the session to `Authenticated`.
//! - The first `None` triggers one automatic sign-in: the bootstrap
//!   credential when configured, anonymous sign-in otherwise. Failure leaves
//!   the session `Failed` but ready, and nothing is retried.
//! - Any later `None` re-enters `Unauthenticated` without a new attempt.
//!
//! At most one identity resolution is in flight at a time. An interactive
//! sign-in that would overlap another resolution is rejected, while a `None`
//! that arrives during an interactive sign-in waits for it to settle before
//! deciding on the automatic attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use echo_domain::{
    BootstrapCredential, Identity, JournalError, ProviderKind, Result, Session, SessionState,
};
use parking_lot::Mutex;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ports::IdentityProvider;
use crate::subscription::Subscription;

struct Shared {
    provider: Arc<dyn IdentityProvider>,
    bootstrap: Option<BootstrapCredential>,
    session: watch::Sender<Session>,
    resolving: AsyncMutex<()>,
    auto_attempted: AtomicBool,
}

struct Listener {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Single owner of the authentication session.
pub struct AuthSessionManager {
    shared: Arc<Shared>,
    listener: Mutex<Option<Listener>>,
}

impl AuthSessionManager {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        bootstrap: Option<BootstrapCredential>,
    ) -> Self {
        let (session, _) = watch::channel(Session::default());
        Self {
            shared: Arc::new(Shared {
                provider,
                bootstrap,
                session,
                resolving: AsyncMutex::new(()),
                auto_attempted: AtomicBool::new(false),
            }),
            listener: Mutex::new(None),
        }
    }

    /// Subscribe to provider changes. Calling it again while the listener
    /// runs is a no-op.
    pub fn start(&self) {
        let mut listener = self.listener.lock();
        if listener.as_ref().is_some_and(|l| !l.handle.is_finished()) {
            debug!("auth listener already running");
            return;
        }

        let subscription = self.shared.provider.subscribe();
        let cancel = subscription.cancellation_token();
        let shared = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move { shared.listen(subscription).await });
        *listener = Some(Listener { cancel, handle });
        info!("auth session listener started");
    }

    /// Unsubscribe from the provider and wait for the listener to stop.
    pub async fn shutdown(&self) {
        let listener = self.listener.lock().take();
        if let Some(Listener { cancel, handle }) = listener {
            cancel.cancel();
            if let Err(err) = handle.await {
                warn!(error = %err, "auth listener ended abnormally");
            }
            info!("auth session listener stopped");
        }
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.shared.session.borrow().clone()
    }

    /// Read-only change stream of the session.
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.shared.session.subscribe()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.shared.session.borrow().identity.clone()
    }

    /// User-triggered sign-in.
    ///
    /// The session only changes on success. Failures are returned to the
    /// caller and never retried.
    ///
    /// # Errors
    /// Returns `JournalError::Authentication` if the provider refuses or
    /// another identity resolution is in flight.
    pub async fn sign_in_interactive(&self, provider: ProviderKind) -> Result<Identity> {
        let Ok(_resolution) = self.shared.resolving.try_lock() else {
            return Err(JournalError::Authentication(
                "identity resolution already in progress".into(),
            ));
        };

        match self.shared.provider.sign_in_interactive(provider).await {
            Ok(identity) => {
                info!(user_id = %identity.user_id, provider = %provider, "interactive sign-in succeeded");
                self.shared.set_authenticated(identity.clone());
                Ok(identity)
            }
            Err(err) => {
                warn!(provider = %provider, error = %err, "interactive sign-in failed");
                Err(as_authentication(err))
            }
        }
    }
}

impl Drop for AuthSessionManager {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.get_mut().as_ref() {
            listener.cancel.cancel();
        }
    }
}

impl Shared {
    async fn listen(&self, mut subscription: Subscription<Option<Identity>>) {
        while let Some(event) = subscription.next().await {
            match event {
                Some(identity) => {
                    debug!(user_id = %identity.user_id, "provider reported identity");
                    self.set_authenticated(identity);
                }
                None => self.on_signed_out().await,
            }
        }
        debug!("auth subscription closed");
    }

    async fn on_signed_out(&self) {
        let _resolution = match self.resolving.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("identity resolution in flight, waiting before automatic sign-in");
                let guard = self.resolving.lock().await;
                if self.session.borrow().identity.is_some() {
                    debug!("resolution left an identity, dropping superseded sign-out");
                    self.auto_attempted.store(true, Ordering::SeqCst);
                    return;
                }
                guard
            }
        };

        if self.auto_attempted.swap(true, Ordering::SeqCst) {
            self.session.send_if_modified(|session| {
                let next = session.signed_out();
                if *session == next {
                    return false;
                }
                *session = next;
                true
            });
            return;
        }

        self.session.send_modify(|session| *session = session.authenticating());
        let result = match &self.bootstrap {
            Some(credential) => {
                debug!("signing in with bootstrap credential");
                self.provider.sign_in_with_credential(credential).await
            }
            None => {
                debug!("signing in anonymously");
                self.provider.sign_in_anonymous().await
            }
        };

        match result {
            Ok(identity) => {
                info!(user_id = %identity.user_id, anonymous = identity.anonymous, "automatic sign-in succeeded");
                self.set_authenticated(identity);
            }
            Err(err) => {
                warn!(error = %err, "automatic sign-in failed");
                self.session.send_replace(Session::failed(as_authentication(err)));
            }
        }
    }

    fn set_authenticated(&self, identity: Identity) {
        self.session.send_if_modified(|session| {
            if session.state == SessionState::Authenticated
                && session.identity.as_ref() == Some(&identity)
            {
                return false;
            }
            *session = Session::authenticated(identity);
            true
        });
    }
}

fn as_authentication(err: JournalError) -> JournalError {
    match err {
        JournalError::Authentication(_) => err,
        other => JournalError::Authentication(other.to_string()),
    }
}
