//! Domain types and models

pub mod entry;
pub mod generation;
pub mod identity;
pub mod mirror;
pub mod prompts;
pub mod session;

pub use entry::{EntryId, EntryText, JournalEntry, NewEntry};
pub use generation::{GenerateContentRequest, GenerateContentResponse};
pub use identity::{BootstrapCredential, Identity, ProviderKind, UserId};
pub use mirror::Mirror;
pub use prompts::PromptSet;
pub use session::{Session, SessionState};
