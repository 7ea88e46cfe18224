//! Testing utilities and helpers
//!
//! - **[`time`]**: [`MockSleeper`] for deterministic backoff timing
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use echo_common::resilience::Sleeper;
//! use echo_common::testing::MockSleeper;
//!
//! let sleeper = MockSleeper::new();
//! let injected: Arc<dyn Sleeper> = Arc::new(sleeper.clone());
//! // hand `injected` to the code under test, then inspect `sleeper.sleeps()`
//! # drop(injected);
//! ```

pub mod time;

pub use time::MockSleeper;
