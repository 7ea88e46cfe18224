/// Gemini integration for reflective prompt generation
///
/// Implements `GenerationTransport` over the `generateContent` REST endpoint.
/// The transport sends one request per call; rate limiting and backoff are
/// handled by `echo_core::ResilientApiClient`.
///
/// # Usage
///
/// ```no_run
/// use std::sync::Arc;
/// use echo_core::ResilientApiClient;
/// use echo_domain::{GenerateContentRequest, GenerationConfig};
/// use echo_infra::integrations::GeminiTransport;
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = GenerationConfig::new(std::env::var("ECHO_GENERATION_API_KEY")?);
/// let transport = Arc::new(GeminiTransport::new(&config)?);
/// let client = ResilientApiClient::from_config(transport, &config)?;
///
/// let prompts = client.invoke(&GenerateContentRequest::reflection("Today was good.")).await?;
/// println!("{prompts:?}");
/// # Ok(())
/// # }
/// ```
mod client;

pub use client::GeminiTransport;
