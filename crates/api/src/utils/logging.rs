use std::time::Duration;

use echo_domain::{ApiError, JournalError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format (`json` or `pretty`).
pub const LOG_FORMAT_VAR: &str = "ECHO_LOG_FORMAT";

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. Set
/// `ECHO_LOG_FORMAT=json` for one JSON object per event. Calling this more
/// than once leaves the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_VAR).is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if json { builder.json().try_init() } else { builder.try_init() };

    if let Err(err) = result {
        warn!(error = %err, "tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"journal::save_entry"`).
/// * `elapsed` - Duration the command execution took.
/// * `error` - Stable label of the failure, `None` on success.
///
/// Callers must avoid forwarding entry text or secrets in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error: Option<&'static str>) {
    let duration_ms = elapsed.as_millis() as u64;

    match error {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_label) => {
            warn!(command, duration_ms, error_label, "command_execution_failure");
        }
    }
}

/// Convert a `JournalError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &JournalError) -> &'static str {
    match error {
        JournalError::Configuration(_) => "config",
        JournalError::Authentication(_) => "auth",
        JournalError::Subscription(_) => "subscription",
        JournalError::Persistence(_) => "persistence",
        JournalError::Api(ApiError::RetriesExhausted { .. }) => "rate_limited",
        JournalError::Api(_) => "generation",
        JournalError::InvalidInput(_) => "invalid_input",
        JournalError::Internal(_) => "internal",
    }
}
