//! Presentation commands - front end to services bridge

mod auth;
mod entries;
mod journal;

pub use auth::*;
pub use entries::*;
pub use journal::*;
