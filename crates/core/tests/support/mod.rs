//! Shared test helpers for `echo-core` integration tests.
//!
//! Lightweight in-memory implementations of every core port so scenario
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod identity;
pub mod store;
pub mod transport;

pub use identity::MockIdentityProvider;
pub use store::MockEntryStore;
pub use transport::ScriptedTransport;
