//! Bounded-retry client for the generative-text service
//!
//! Each call sends one request at a time. A 429 waits according to the
//! [`RetryState`] schedule and tries again; every other outcome ends the
//! call immediately. Successful bodies are parsed strictly into the string
//! array payload.
//!
//! The loop accepts no external cancellation: dropping the returned future
//! is the only way to abandon a call part-way through its waits.

use std::sync::Arc;
use std::time::Duration;

use echo_common::resilience::{BackoffConfig, RetryState, RetryStep, Sleeper, TokioSleeper};
use echo_domain::types::generation::parse_string_array;
use echo_domain::{ApiError, GenerateContentRequest, GenerationConfig, JournalError, Result};
use tracing::{debug, instrument, warn};

use super::ports::GenerationTransport;

/// Result of one invocation plus the retry statistics behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome<T> {
    pub result: std::result::Result<T, ApiError>,
    /// Requests sent, including the first.
    pub attempts: u32,
    /// Sum of the waits between attempts.
    pub total_delay: Duration,
}

impl<T> InvocationOutcome<T> {
    pub fn into_result(self) -> std::result::Result<T, ApiError> {
        self.result
    }
}

/// Generative-service invoker with bounded exponential backoff on 429.
pub struct ResilientApiClient {
    transport: Arc<dyn GenerationTransport>,
    sleeper: Arc<dyn Sleeper>,
    backoff: BackoffConfig,
}

impl ResilientApiClient {
    /// Client that waits on the tokio timer.
    pub fn new(transport: Arc<dyn GenerationTransport>, backoff: BackoffConfig) -> Self {
        Self { transport, sleeper: Arc::new(TokioSleeper), backoff }
    }

    /// Build the retry policy from configuration.
    ///
    /// # Errors
    /// Returns `JournalError::Configuration` if the backoff parameters are
    /// invalid.
    pub fn from_config(
        transport: Arc<dyn GenerationTransport>,
        config: &GenerationConfig,
    ) -> Result<Self> {
        let backoff = BackoffConfig::builder()
            .max_retries(config.max_retries)
            .initial_delay(config.initial_delay())
            .multiplier(config.backoff_multiplier)
            .build()
            .map_err(|e| JournalError::Configuration(e.to_string()))?;
        Ok(Self::new(transport, backoff))
    }

    /// Replace the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn backoff(&self) -> &BackoffConfig {
        &self.backoff
    }

    /// Send `request` and return the parsed string array.
    pub async fn invoke(
        &self,
        request: &GenerateContentRequest,
    ) -> std::result::Result<Vec<String>, ApiError> {
        self.invoke_with_outcome(request).await.into_result()
    }

    /// Like [`invoke`](Self::invoke), also reporting attempts and waits.
    #[instrument(skip(self, request), fields(max_retries = self.backoff.max_retries))]
    pub async fn invoke_with_outcome(
        &self,
        request: &GenerateContentRequest,
    ) -> InvocationOutcome<Vec<String>> {
        let mut state = RetryState::initial(&self.backoff);
        let mut total_delay = Duration::ZERO;

        loop {
            let attempt = state.attempts();
            debug!(attempt, "sending generation request");

            let response = match self.transport.send(request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(attempt, error = %err, "generation request did not complete");
                    return InvocationOutcome { result: Err(err), attempts: attempt, total_delay };
                }
            };

            if response.is_success() {
                let result = parse_string_array(&response.body);
                if let Err(err) = &result {
                    warn!(attempt, error = %err, "generation response rejected");
                } else {
                    debug!(attempt, total_delay_ms = total_delay.as_millis() as u64, "generation succeeded");
                }
                return InvocationOutcome { result, attempts: attempt, total_delay };
            }

            let failure = ApiError::from_status(response.status);
            if !failure.is_retryable() {
                warn!(attempt, status = response.status, "generation request failed");
                return InvocationOutcome { result: Err(failure), attempts: attempt, total_delay };
            }

            match state.next(&self.backoff) {
                RetryStep::Retry { wait, next } => {
                    warn!(
                        attempt,
                        delay_ms = wait.as_millis() as u64,
                        error = %failure,
                        "rate limited, backing off"
                    );
                    self.sleeper.sleep(wait).await;
                    total_delay += wait;
                    state = next;
                }
                RetryStep::Exhausted { attempts } => {
                    warn!(attempts, "rate limit persisted, giving up");
                    return InvocationOutcome {
                        result: Err(ApiError::RetriesExhausted { attempts }),
                        attempts,
                        total_delay,
                    };
                }
            }
        }
    }
}
