//! Macro for implementing Display and FromStr for state enums
//!
//! Session and workflow states are logged and serialized as short lowercase
//! labels. This macro keeps the label table in one place for both
//! directions and parses case-insensitively.
//!
//! # Example
//!
//! ```rust
//! use echo_domain::impl_domain_state_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LinkState {
//!     Idle,
//!     Listening,
//!     Closed,
//! }
//!
//! impl_domain_state_conversions!(LinkState {
//!     Idle => "idle",
//!     Listening => "listening",
//!     Closed => "closed",
//! });
//!
//! assert_eq!(LinkState::Listening.to_string(), "listening");
//! assert_eq!("CLOSED".parse::<LinkState>(), Ok(LinkState::Closed));
//! ```

/// Implements Display and FromStr traits for state enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their labels
#[macro_export]
macro_rules! impl_domain_state_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
