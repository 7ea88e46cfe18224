//! Resilience primitives for calls to rate-limited services
//!
//! - **Backoff**: [`BackoffConfig`] plus the pure [`RetryState`] transition
//!   that decides whether and how long to wait before the next attempt
//! - **Sleeper**: the injectable wait used between attempts
//!
//! The two halves are kept apart so the schedule can be tested without a
//! runtime and the loop can be tested without real time passing.

pub mod backoff;
#[cfg(feature = "runtime")]
pub mod sleeper;

pub use backoff::{BackoffConfig, BackoffConfigBuilder, BackoffError, RetryState, RetryStep};
#[cfg(feature = "runtime")]
pub use sleeper::{Sleeper, TokioSleeper};
