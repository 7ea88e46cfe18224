//! # Echo Journal Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client implementation
//! - The Gemini generative-service transport
//! - Configuration loading from environment and files
//! - In-process store and identity adapters
//!
//! ## Architecture
//! - Implements traits defined in `echo-core`
//! - Depends on `echo-domain`, `echo-common` and `echo-core`
//! - Contains all "impure" code (I/O, network)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod local;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::GeminiTransport;
pub use local::{InMemoryEntryStore, LocalIdentityProvider};
