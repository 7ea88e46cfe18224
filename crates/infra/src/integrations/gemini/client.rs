/// Gemini `generateContent` transport
use async_trait::async_trait;
use echo_core::{GenerationTransport, TransportResponse};
use echo_domain::constants::JSON_MIME_TYPE;
use echo_domain::{ApiError, GenerateContentRequest, GenerationConfig, JournalError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use tracing::debug;

use crate::errors::IntoApiError;
use crate::http::HttpClient;

const USER_AGENT: &str = concat!("echo-journal/", env!("CARGO_PKG_VERSION"));

/// Gemini API transport for structured-output generation
pub struct GeminiTransport {
    http_client: HttpClient,
    api_key: String,
    endpoint: String,
}

impl GeminiTransport {
    /// Create a transport from validated generation settings.
    ///
    /// # Errors
    /// Returns `JournalError::Configuration` if the settings are invalid, or
    /// the error raised while building the HTTP client.
    pub fn new(config: &GenerationConfig) -> Result<Self, JournalError> {
        config.validate()?;
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a transport reusing an existing HTTP client.
    pub fn with_http_client(config: &GenerationConfig, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl GenerationTransport for GeminiTransport {
    async fn send(&self, request: &GenerateContentRequest) -> Result<TransportResponse, ApiError> {
        let builder = self
            .http_client
            .request(Method::POST, &self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header(CONTENT_TYPE, JSON_MIME_TYPE)
            .json(request);

        let response = self.http_client.send(builder).await?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(IntoApiError::into_api_error)?;

        debug!(status, body_len = body.len(), "generation response received");
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use echo_common::testing::MockSleeper;
    use echo_core::ResilientApiClient;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const MODEL_PATH: &str = "/v1beta/models/test-model:generateContent";

    fn config(server: &MockServer) -> GenerationConfig {
        GenerationConfig::new("test-key").with_endpoint(format!("{}{MODEL_PATH}", server.uri()))
    }

    fn prompts_body(prompts: &[&str]) -> serde_json::Value {
        let inner = serde_json::to_string(prompts).unwrap();
        json!({ "candidates": [{ "content": { "parts": [{ "text": inner }] } }] })
    }

    #[tokio::test]
    async fn sends_key_as_query_parameter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(query_param("key", "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(prompts_body(&["Why?"])))
            .expect(1)
            .mount(&server)
            .await;

        let transport = GeminiTransport::new(&config(&server)).expect("transport");
        let response = transport
            .send(&GenerateContentRequest::reflection("A quiet day."))
            .await
            .expect("response");

        assert!(response.is_success());
        assert_eq!(
            echo_domain::types::generation::parse_string_array(&response.body).expect("prompts"),
            vec!["Why?".to_string()]
        );
    }

    #[tokio::test]
    async fn passes_status_through() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let transport = GeminiTransport::new(&config(&server)).expect("transport");
        let response =
            transport.send(&GenerateContentRequest::reflection("x")).await.expect("response");

        assert_eq!(response.status, 429);
    }

    #[tokio::test]
    async fn recovers_from_rate_limits_through_retry_client() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(prompts_body(&["Q1", "Q2"])))
            .mount(&server)
            .await;

        let config = config(&server);
        let sleeper = MockSleeper::new();
        let transport = Arc::new(GeminiTransport::new(&config).expect("transport"));
        let client = ResilientApiClient::from_config(transport, &config)
            .expect("client")
            .with_sleeper(Arc::new(sleeper.clone()));

        let outcome =
            client.invoke_with_outcome(&GenerateContentRequest::reflection("Today was good.")).await;

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.result, Ok(vec!["Q1".to_string(), "Q2".to_string()]));
        assert_eq!(sleeper.total(), Duration::from_millis(3000));
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = GenerationConfig::new("");
        assert!(matches!(GeminiTransport::new(&config), Err(JournalError::Configuration(_))));
    }
}
