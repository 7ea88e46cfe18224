//! Injectable suspension for retry loops
//!
//! Production code waits on the tokio timer; tests swap in
//! [`MockSleeper`](crate::testing::MockSleeper) to record the waits
//! without spending wall-clock time.

use std::time::Duration;

use async_trait::async_trait;

/// Non-blocking wait used between retry attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
