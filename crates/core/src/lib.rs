//! # Echo Journal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for the identity provider, the entry
//!   store and the generative-service transport
//! - The cancelable subscription abstraction those ports push through
//! - Services: session management, live sync, resilient generation and the
//!   save workflow
//!
//! ## Architecture Principles
//! - Only depends on `echo-common` and `echo-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - State is owned by one service and exposed as read-only watch channels

pub mod auth;
pub mod generation;
pub mod journal;
pub mod subscription;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use auth::{AuthSessionManager, IdentityProvider};
pub use generation::{GenerationTransport, InvocationOutcome, ResilientApiClient, TransportResponse};
pub use journal::{EntrySaveWorkflow, WorkflowState};
pub use subscription::{Subscription, SubscriptionSink};
pub use sync::{CollectionSynchronizer, EntryQuery, EntryStore, SortDirection, StoreNotification};
