//! # Echo Journal Domain
//!
//! Business domain types and models for the journaling client.
//!
//! This crate contains:
//! - Domain data types (Session, JournalEntry, Mirror, PromptSet)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Wire types for the generative-service envelope
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other workspace crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
