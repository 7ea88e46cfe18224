//! Authentication session management

pub mod manager;
pub mod ports;

pub use manager::AuthSessionManager;
pub use ports::IdentityProvider;
