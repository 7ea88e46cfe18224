//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Generative service retry defaults
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;
pub const DEFAULT_BACKOFF_MULTIPLIER: u32 = 2;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP status the generative service uses for rate limiting.
pub const RATE_LIMIT_STATUS: u16 = 429;

// Generative service endpoint
pub const DEFAULT_GENERATION_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";
pub const JSON_MIME_TYPE: &str = "application/json";

/// Instruction placed in front of the saved entry text.
pub const REFLECTION_PROMPT_PREFIX: &str = "Based on the following journal entry, generate three thoughtful, reflective questions for a user to consider. Format the questions as a JSON array of strings. The entry is: ";

// Store layout
pub const DEFAULT_APP_ID: &str = "default-app-id";
/// Document field the store stamps on acknowledgment and orders by.
pub const CREATED_AT_FIELD: &str = "timestamp";
