//! External service integrations.

pub mod gemini;

pub use gemini::GeminiTransport;
