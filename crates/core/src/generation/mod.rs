//! Generative-service client with bounded retry

pub mod client;
pub mod ports;

pub use client::{InvocationOutcome, ResilientApiClient};
pub use ports::{GenerationTransport, TransportResponse};
