//! Collection synchronizer
//!
//! Keeps the local [`Mirror`] equal to the latest snapshot the store pushed
//! for the signed-in user. Exactly one store subscription is live at a
//! time. Switching identity cancels the old subscription and empties the
//! mirror before the new one is opened.
//!
//! A failed notification ends the subscription: the mirror keeps its last
//! good snapshot, a `Subscription` error is published, and nothing reopens
//! until [`CollectionSynchronizer::reload`] or a new identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use echo_domain::{Identity, JournalError, Mirror, Result, Session, StoreConfig, UserId};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ports::{EntryQuery, EntryStore};
use crate::subscription::Subscription;

struct ActiveSubscription {
    identity: Identity,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ActiveSubscription {
    fn is_live(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }
}

struct Follower {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owner of the live local mirror.
pub struct CollectionSynchronizer {
    store: Arc<dyn EntryStore>,
    store_config: StoreConfig,
    mirror: Arc<watch::Sender<Mirror>>,
    errors: Arc<watch::Sender<Option<JournalError>>>,
    epoch: Arc<AtomicU64>,
    active: Mutex<Option<ActiveSubscription>>,
    follower: Mutex<Option<Follower>>,
}

impl CollectionSynchronizer {
    pub fn new(store: Arc<dyn EntryStore>, store_config: StoreConfig) -> Self {
        let (mirror, _) = watch::channel(Mirror::empty());
        let (errors, _) = watch::channel(None);
        Self {
            store,
            store_config,
            mirror: Arc::new(mirror),
            errors: Arc::new(errors),
            epoch: Arc::new(AtomicU64::new(0)),
            active: Mutex::new(None),
            follower: Mutex::new(None),
        }
    }

    /// Open the live subscription for `identity`.
    ///
    /// No-op while a subscription for the same identity is live. A different
    /// identity closes the previous subscription and clears the mirror
    /// first.
    pub fn open(&self, identity: &Identity) {
        let mut active = self.active.lock();
        let switching = match active.as_ref() {
            Some(current) if current.identity.user_id == identity.user_id => {
                if current.is_live() {
                    debug!(user_id = %identity.user_id, "subscription already open");
                    return;
                }
                false
            }
            Some(_) => true,
            None => false,
        };
        if let Some(previous) = active.take() {
            previous.cancel.cancel();
        }

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if switching {
            self.mirror.send_replace(Mirror::empty());
        }
        self.errors.send_replace(None);

        let collection = self.store_config.collection_path(&identity.user_id);
        let subscription = self.store.subscribe_ordered(EntryQuery::newest_first(collection));
        let cancel = subscription.cancellation_token();
        let handle = tokio::spawn(pump(
            subscription,
            epoch,
            Arc::clone(&self.epoch),
            Arc::clone(&self.mirror),
            Arc::clone(&self.errors),
        ));

        info!(user_id = %identity.user_id, "entry subscription opened");
        *active = Some(ActiveSubscription { identity: identity.clone(), cancel, handle });
    }

    /// Cancel the live subscription. Idempotent. The mirror keeps its
    /// current snapshot.
    pub fn close(&self) {
        let active = self.active.lock();
        if let Some(current) = active.as_ref().filter(|current| current.is_live()) {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            current.cancel.cancel();
            info!(user_id = %current.identity.user_id, "entry subscription closed");
        }
    }

    /// Close and reopen the subscription for the last opened identity.
    ///
    /// # Errors
    /// Returns `JournalError::Subscription` if no identity was ever opened.
    pub fn reload(&self) -> Result<()> {
        let identity = self
            .active
            .lock()
            .as_ref()
            .map(|current| current.identity.clone())
            .ok_or_else(|| JournalError::Subscription("no open subscription to reload".into()))?;
        debug!(user_id = %identity.user_id, "reloading entry subscription");
        self.close();
        self.open(&identity);
        Ok(())
    }

    /// Open and close in step with a session stream.
    ///
    /// An authenticated identity opens its subscription; losing the identity
    /// closes it and clears the mirror.
    pub fn follow(self: &Arc<Self>, sessions: watch::Receiver<Session>) {
        let mut follower = self.follower.lock();
        if let Some(previous) = follower.take() {
            previous.cancel.cancel();
        }
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(follow_sessions(Arc::downgrade(self), sessions, cancel.clone()));
        *follower = Some(Follower { cancel, handle });
    }

    /// Stop following sessions, close the subscription and wait for both
    /// background tasks.
    pub async fn shutdown(&self) {
        let follower = self.follower.lock().take();
        if let Some(Follower { cancel, handle }) = follower {
            cancel.cancel();
            if let Err(err) = handle.await {
                warn!(error = %err, "session follower ended abnormally");
            }
        }

        let active = self.active.lock().take();
        if let Some(ActiveSubscription { cancel, handle, .. }) = active {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            cancel.cancel();
            if let Err(err) = handle.await {
                warn!(error = %err, "entry subscription ended abnormally");
            }
        }
    }

    /// Current mirror snapshot.
    pub fn mirror(&self) -> Mirror {
        self.mirror.borrow().clone()
    }

    /// Read-only stream of mirror replacements.
    pub fn watch(&self) -> watch::Receiver<Mirror> {
        self.mirror.subscribe()
    }

    /// Read-only stream of the last subscription error.
    pub fn errors(&self) -> watch::Receiver<Option<JournalError>> {
        self.errors.subscribe()
    }

    pub fn last_error(&self) -> Option<JournalError> {
        self.errors.borrow().clone()
    }

    /// Whether a subscription is currently delivering.
    pub fn is_open(&self) -> bool {
        self.active.lock().as_ref().is_some_and(ActiveSubscription::is_live)
    }

    fn close_and_clear(&self) {
        self.close();
        *self.active.lock() = None;
        self.mirror.send_replace(Mirror::empty());
        self.errors.send_replace(None);
    }
}

impl Drop for CollectionSynchronizer {
    fn drop(&mut self) {
        if let Some(follower) = self.follower.get_mut().as_ref() {
            follower.cancel.cancel();
        }
        if let Some(active) = self.active.get_mut().as_ref() {
            active.cancel.cancel();
        }
    }
}

async fn pump(
    mut subscription: Subscription<super::ports::StoreNotification>,
    epoch: u64,
    current_epoch: Arc<AtomicU64>,
    mirror: Arc<watch::Sender<Mirror>>,
    errors: Arc<watch::Sender<Option<JournalError>>>,
) {
    while let Some(notification) = subscription.next().await {
        match notification {
            Ok(entries) => {
                let snapshot = Mirror::from_snapshot(entries);
                let count = snapshot.len();
                // the epoch check runs under the watch lock, so a replaced
                // subscription can never overwrite a newer mirror
                let applied = mirror.send_if_modified(|current| {
                    if current_epoch.load(Ordering::SeqCst) != epoch {
                        return false;
                    }
                    *current = snapshot;
                    true
                });
                if applied {
                    debug!(entries = count, "mirror replaced");
                }
            }
            Err(err) => {
                warn!(error = %err, "entry subscription failed, keeping last snapshot");
                if current_epoch.load(Ordering::SeqCst) == epoch {
                    let error = match err {
                        JournalError::Subscription(_) => err,
                        other => JournalError::Subscription(other.to_string()),
                    };
                    errors.send_replace(Some(error));
                }
                break;
            }
        }
    }
}

async fn follow_sessions(
    synchronizer: Weak<CollectionSynchronizer>,
    mut sessions: watch::Receiver<Session>,
    cancel: CancellationToken,
) {
    let mut followed: Option<UserId> = None;
    loop {
        let identity = sessions.borrow_and_update().identity.clone();
        let Some(this) = synchronizer.upgrade() else { break };
        match identity {
            Some(identity) if followed.as_ref() != Some(&identity.user_id) => {
                followed = Some(identity.user_id.clone());
                this.open(&identity);
            }
            None if followed.is_some() => {
                followed = None;
                this.close_and_clear();
            }
            _ => {}
        }
        drop(this);

        tokio::select! {
            () = cancel.cancelled() => break,
            changed = sessions.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!("session follower stopped");
}
