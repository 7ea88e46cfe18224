//! Conversions from external infrastructure errors into domain errors.

use echo_domain::{ApiError, JournalError};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub JournalError);

impl From<InfraError> for JournalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<JournalError> for InfraError {
    fn from(value: JournalError) -> Self {
        InfraError(value)
    }
}

/// Conversion into the generative-service error for adapters that sit
/// behind `GenerationTransport`.
pub trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for HttpError {
    fn into_api_error(self) -> ApiError {
        // Strip the URL: the generative endpoint carries its key as a query parameter.
        let err = self.without_url();

        let message = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else if err.is_decode() {
            return ApiError::parse(err.to_string());
        } else if err.is_builder() {
            format!("invalid request: {err}")
        } else {
            err.to_string()
        };

        ApiError::transport(message)
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(JournalError::Api(value.into_api_error()))
    }
}

/* -------------------------------------------------------------------------- */
/* serde / toml errors → JournalError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(JournalError::Internal(format!("JSON serialization failed: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(JournalError::Configuration(format!("Invalid TOML format: {value}")))
    }
}
