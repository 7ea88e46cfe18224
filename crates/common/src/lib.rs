//! Modular common utilities shared across Echo Journal crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: backoff configuration and the pure retry transition
//! - `runtime`: async infrastructure (sleepers)
//! - `test-utils`: deterministic test doubles

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Resilience: backoff is foundation, sleepers need the runtime
// --------------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use resilience::{BackoffConfig, BackoffConfigBuilder, BackoffError, RetryState, RetryStep};
#[cfg(feature = "runtime")]
pub use resilience::{Sleeper, TokioSleeper};
