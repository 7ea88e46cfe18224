//! In-process adapters
//!
//! Stand-ins for the hosted document store and identity provider. The
//! terminal client runs on them, and tests use their failure injection to
//! drive error paths.

mod identity;
mod store;

pub use identity::LocalIdentityProvider;
pub use store::InMemoryEntryStore;
