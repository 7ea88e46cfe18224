#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use echo_app::AppContext;
use echo_common::testing::MockSleeper;
use echo_domain::{AppConfig, AuthConfig, GenerationConfig, StoreConfig};
use echo_infra::{InMemoryEntryStore, LocalIdentityProvider};
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Started application on local adapters, generating against a mock server.
pub struct TestApp {
    pub ctx: AppContext,
    pub store: Arc<InMemoryEntryStore>,
    pub provider: Arc<LocalIdentityProvider>,
    pub sleeper: MockSleeper,
    pub server: MockServer,
}

/// Configuration whose generation endpoint points at `server`.
pub fn test_config(server: &MockServer) -> AppConfig {
    AppConfig {
        store: StoreConfig::new("echo-test", "store-key"),
        generation: GenerationConfig::new("gen-key")
            .with_endpoint(format!("{}/v1beta/models/test:generateContent", server.uri())),
        auth: AuthConfig::default(),
    }
}

/// Generation response carrying `prompts` as its JSON array text.
pub fn prompts_response(prompts: &[&str]) -> ResponseTemplate {
    let inner = serde_json::to_string(prompts).expect("prompts serialize");
    ResponseTemplate::new(200)
        .set_body_json(json!({ "candidates": [{ "content": { "parts": [{ "text": inner }] } }] }))
}

/// Answer the next `times` generation requests with `status`.
pub async fn mount_status(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// Answer every remaining generation request with `prompts`.
pub async fn mount_prompts(server: &MockServer, prompts: &[&str]) {
    Mock::given(method("POST")).respond_with(prompts_response(prompts)).mount(server).await;
}

/// Build, start and wait for the session to settle.
pub async fn start_app(provider: LocalIdentityProvider) -> TestApp {
    let server = MockServer::start().await;
    start_app_with(server, provider, |config| config).await
}

pub async fn start_app_with(
    server: MockServer,
    provider: LocalIdentityProvider,
    configure: impl FnOnce(AppConfig) -> AppConfig,
) -> TestApp {
    let store = Arc::new(InMemoryEntryStore::new());
    let provider = Arc::new(provider);
    let sleeper = MockSleeper::new();

    let ctx = AppContext::builder(configure(test_config(&server)))
        .store(store.clone())
        .identity_provider(provider.clone())
        .sleeper(Arc::new(sleeper.clone()))
        .build()
        .expect("context builds");
    ctx.start();
    ctx.wait_until_ready(Duration::from_secs(5)).await.expect("session settles");

    TestApp { ctx, store, provider, sleeper, server }
}
