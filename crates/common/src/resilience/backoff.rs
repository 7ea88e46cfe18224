//! Bounded exponential backoff as an explicit state machine
//!
//! [`RetryState`] carries the attempt counter and the delay to wait before
//! the next attempt. [`RetryState::next`] is a pure transition: it never
//! sleeps and never reads a clock, so the whole schedule can be checked
//! without a runtime. Callers pair it with a [`Sleeper`](super::Sleeper).
//!
//! ```
//! use std::time::Duration;
//!
//! use echo_common::resilience::{BackoffConfig, RetryState, RetryStep};
//!
//! let config = BackoffConfig::builder()
//!     .max_retries(2)
//!     .initial_delay(Duration::from_millis(100))
//!     .multiplier(2)
//!     .build()
//!     .unwrap();
//!
//! let state = RetryState::initial(&config);
//! let RetryStep::Retry { wait, next } = state.next(&config) else { panic!() };
//! assert_eq!(wait, Duration::from_millis(100));
//! let RetryStep::Retry { wait, next } = next.next(&config) else { panic!() };
//! assert_eq!(wait, Duration::from_millis(200));
//! assert_eq!(next.next(&config), RetryStep::Exhausted { attempts: 3 });
//! ```

use std::time::Duration;

use thiserror::Error;

/// Invalid backoff parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackoffError {
    #[error("Invalid backoff configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Retry budget and delay growth for one kind of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry.
    pub initial_delay: Duration,
    /// Factor applied to the delay after every wait.
    pub multiplier: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self { max_retries: 5, initial_delay: Duration::from_millis(1000), multiplier: 2 }
    }
}

impl BackoffConfig {
    pub fn builder() -> BackoffConfigBuilder {
        BackoffConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<(), BackoffError> {
        if self.initial_delay.is_zero() {
            return Err(BackoffError::InvalidConfiguration {
                message: "initial_delay must be greater than 0".to_string(),
            });
        }
        if self.multiplier == 0 {
            return Err(BackoffError::InvalidConfiguration {
                message: "multiplier must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Upper bound on attempts for a single call.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Sum of every wait if the budget is used up.
    pub fn worst_case_wait(&self) -> Duration {
        let mut state = RetryState::initial(self);
        let mut total = Duration::ZERO;
        while let RetryStep::Retry { wait, next } = state.next(self) {
            total = total.saturating_add(wait);
            state = next;
        }
        total
    }
}

/// Builder for [`BackoffConfig`] with fluent API
#[derive(Debug, Default)]
pub struct BackoffConfigBuilder {
    config: BackoffConfig,
}

impl BackoffConfigBuilder {
    pub fn new() -> Self {
        Self { config: BackoffConfig::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.config.initial_delay = delay;
        self
    }

    pub fn multiplier(mut self, multiplier: u32) -> Self {
        self.config.multiplier = multiplier;
        self
    }

    pub fn build(self) -> Result<BackoffConfig, BackoffError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Position within one call's retry schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Retries already taken; 0 during the first attempt.
    pub attempt: u32,
    /// Wait before the next retry.
    pub delay: Duration,
}

/// Result of feeding a retryable failure into [`RetryState::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStep {
    /// Wait `wait`, then try again from `next`.
    Retry { wait: Duration, next: RetryState },
    /// Budget spent; `attempts` calls were made.
    Exhausted { attempts: u32 },
}

impl RetryState {
    pub fn initial(config: &BackoffConfig) -> Self {
        Self { attempt: 0, delay: config.initial_delay }
    }

    /// Attempts made so far, counting the one in progress.
    pub fn attempts(&self) -> u32 {
        self.attempt.saturating_add(1)
    }

    /// Transition after the current attempt failed with a retryable error.
    #[must_use]
    pub fn next(self, config: &BackoffConfig) -> RetryStep {
        if self.attempt >= config.max_retries {
            return RetryStep::Exhausted { attempts: self.attempts() };
        }
        RetryStep::Retry {
            wait: self.delay,
            next: RetryState {
                attempt: self.attempt + 1,
                delay: self.delay.saturating_mul(config.multiplier),
            },
        }
    }
}
