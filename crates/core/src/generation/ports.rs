//! Port interfaces for the generative-text service

use async_trait::async_trait;
use echo_domain::{ApiError, GenerateContentRequest};

/// Raw outcome of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends exactly one request per call. Retrying is the caller's job.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    /// `Err` only when no HTTP response was received.
    async fn send(&self, request: &GenerateContentRequest) -> Result<TransportResponse, ApiError>;
}
