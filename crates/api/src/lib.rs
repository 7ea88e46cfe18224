//! # Echo Journal App
//!
//! Application layer - commands and composition root.
//!
//! This crate contains:
//! - Presentation commands (terminal → services bridge)
//! - Application context (dependency injection)
//! - Logging setup shared by the binary and tests
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
