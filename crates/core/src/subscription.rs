//! Cancelable push subscriptions
//!
//! Ports that deliver a stream of changes (identity changes, store
//! snapshots) hand out a [`Subscription`] and keep the matching
//! [`SubscriptionSink`]. Cancelling the subscription, or dropping it,
//! releases the producer side: [`SubscriptionSink::is_closed`] turns true and
//! further emits are discarded.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Create a connected sink/subscription pair.
pub fn channel<T>() -> (SubscriptionSink<T>, Subscription<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let token = CancellationToken::new();
    (SubscriptionSink { tx, token: token.clone() }, Subscription { rx, token })
}

/// Consumer end of a push subscription.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
    token: CancellationToken,
}

impl<T> Subscription<T> {
    /// Next delivered item, or `None` once cancelled or the producer is gone.
    pub async fn next(&mut self) -> Option<T> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            item = self.rx.recv() => item,
        }
    }

    /// Unsubscribe. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Handle that cancels this subscription from elsewhere.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Producer end of a push subscription.
#[derive(Debug)]
pub struct SubscriptionSink<T> {
    tx: mpsc::UnboundedSender<T>,
    token: CancellationToken,
}

impl<T> Clone for SubscriptionSink<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone(), token: self.token.clone() }
    }
}

impl<T> SubscriptionSink<T> {
    /// Deliver an item. Returns `false` if the subscriber is gone.
    pub fn emit(&self, item: T) -> bool {
        if self.is_closed() {
            return false;
        }
        self.tx.send(item).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves once the subscriber cancels.
    pub async fn closed(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_order() {
        let (sink, mut sub) = channel();
        assert!(sink.emit(1));
        assert!(sink.emit(2));
        assert_eq!(sub.next().await, Some(1));
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn cancel_stops_delivery_and_closes_sink() {
        let (sink, mut sub) = channel();
        assert!(sink.emit("queued"));
        sub.cancel();
        sub.cancel();

        assert!(sink.is_closed());
        assert!(!sink.emit("late"));
        assert_eq!(sub.next().await, None);
    }

    #[tokio::test]
    async fn dropping_subscription_closes_sink() {
        let (sink, sub) = channel::<u8>();
        drop(sub);
        assert!(sink.is_closed());
        sink.closed().await;
    }

    #[tokio::test]
    async fn dropping_all_sinks_ends_stream() {
        let (sink, mut sub) = channel::<u8>();
        drop(sink);
        assert_eq!(sub.next().await, None);
        assert!(!sub.is_cancelled());
    }
}
