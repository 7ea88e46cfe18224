//! Time mocking for retry tests
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use echo_common::resilience::Sleeper;
//! use echo_common::testing::MockSleeper;
//!
//! # tokio_test::block_on(async {
//! let sleeper = MockSleeper::new();
//! sleeper.sleep(Duration::from_millis(1000)).await;
//! sleeper.sleep(Duration::from_millis(2000)).await;
//! assert_eq!(sleeper.total(), Duration::from_millis(3000));
//! # });
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::resilience::Sleeper;

/// Sleeper that returns immediately and records every requested wait.
///
/// Clones share the same record, so a test can keep one handle and give the
/// other to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockSleeper {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl MockSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits requested so far, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.sleeps.lock().len()
    }

    /// Sum of all requested waits.
    pub fn total(&self) -> Duration {
        self.sleeps.lock().iter().sum()
    }

    pub fn reset(&self) {
        self.sleeps.lock().clear();
    }
}

#[async_trait]
impl Sleeper for MockSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        tokio::task::yield_now().await;
    }
}
