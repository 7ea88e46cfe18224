//! Integration tests for resilience module
//!
//! Drives the pure retry transition with a recording sleeper the way a
//! client retry loop does.

#![cfg(feature = "test-utils")]

use std::time::Duration;

use echo_common::resilience::{BackoffConfig, RetryState, RetryStep, Sleeper};
use echo_common::testing::MockSleeper;

/// Minimal loop: `failures` rate-limited attempts, then success.
async fn run(config: &BackoffConfig, sleeper: &dyn Sleeper, failures: u32) -> Result<u32, u32> {
    let mut state = RetryState::initial(config);
    loop {
        if state.attempt >= failures {
            return Ok(state.attempts());
        }
        match state.next(config) {
            RetryStep::Retry { wait, next } => {
                sleeper.sleep(wait).await;
                state = next;
            }
            RetryStep::Exhausted { attempts } => return Err(attempts),
        }
    }
}

/// Two rate-limited attempts followed by success.
///
/// # Test Steps
/// 1. Default policy (5 retries, 1000ms, x2)
/// 2. Fail twice, then succeed
/// 3. Confirm 3 attempts and 1000ms + 2000ms of waiting
#[tokio::test]
async fn test_recovers_after_two_rate_limits() {
    let config = BackoffConfig::default();
    let sleeper = MockSleeper::new();

    let attempts = run(&config, &sleeper, 2).await.expect("should recover");

    assert_eq!(attempts, 3);
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(1000), Duration::from_millis(2000)]);
    assert!(sleeper.total() >= Duration::from_millis(3000));
}

/// Budget exhaustion stops after max_retries + 1 attempts without a
/// trailing wait.
#[tokio::test]
async fn test_exhaustion_is_bounded() {
    let config = BackoffConfig::builder()
        .max_retries(3)
        .initial_delay(Duration::from_millis(50))
        .build()
        .expect("valid");
    let sleeper = MockSleeper::new();

    let attempts = run(&config, &sleeper, u32::MAX).await.unwrap_err();

    assert_eq!(attempts, 4);
    assert_eq!(sleeper.count(), 3);
    assert_eq!(sleeper.total(), config.worst_case_wait());
}

/// A first-attempt success never waits.
#[tokio::test]
async fn test_immediate_success_never_sleeps() {
    let config = BackoffConfig::default();
    let sleeper = MockSleeper::new();

    assert_eq!(run(&config, &sleeper, 0).await, Ok(1));
    assert_eq!(sleeper.count(), 0);
}
