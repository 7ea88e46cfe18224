//! Scripted generative-service transport

use std::collections::VecDeque;

use async_trait::async_trait;
use echo_core::{GenerationTransport, TransportResponse};
use echo_domain::{ApiError, GenerateContentRequest};
use parking_lot::Mutex;
use serde_json::json;

/// Replays queued responses and records every request it sees.
///
/// Once the queue is empty every call answers 500.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_status(self, status: u16) -> Self {
        self.responses.lock().push_back(TransportResponse::new(status, "{}"));
        self
    }

    pub fn then_prompts(self, prompts: &[&str]) -> Self {
        self.responses.lock().push_back(prompts_response(prompts));
        self
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl GenerationTransport for ScriptedTransport {
    async fn send(&self, request: &GenerateContentRequest) -> Result<TransportResponse, ApiError> {
        self.requests.lock().push(request.clone());
        Ok(self.responses.lock().pop_front().unwrap_or_else(|| TransportResponse::new(500, "")))
    }
}

/// Success envelope wrapping `prompts` as the inner JSON text.
pub fn prompts_response(prompts: &[&str]) -> TransportResponse {
    let text = serde_json::to_string(prompts).unwrap_or_default();
    let body = json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] });
    TransportResponse::new(200, body.to_string())
}
