//! Shared HTTP plumbing for outbound adapters.

mod client;

pub use client::{HttpClient, HttpClientBuilder};
