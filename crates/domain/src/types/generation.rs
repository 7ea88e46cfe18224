//! Generative-service wire types
//!
//! Request body and response envelope of the `generateContent` call. The
//! response is parsed strictly: a missing candidate, part or text is a
//! parse failure, and the inner text must itself be a JSON array of
//! strings. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::constants::{JSON_MIME_TYPE, REFLECTION_PROMPT_PREFIX};
use crate::errors::ApiError;

/// Request body for a structured-output generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub response_mime_type: String,
    pub response_schema: ResponseSchema,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
}

impl ResponseSchema {
    pub fn string_array() -> Self {
        Self {
            schema_type: "ARRAY".to_string(),
            items: Some(Box::new(Self { schema_type: "STRING".to_string(), items: None })),
        }
    }
}

impl GenerateContentRequest {
    /// Single-turn prompt asking for a JSON array of strings.
    pub fn string_array(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part { text: prompt.into() }] }],
            generation_config: GenerationSettings {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: ResponseSchema::string_array(),
            },
        }
    }

    /// Reflective-question prompt embedding the saved entry text.
    pub fn reflection(entry_text: &str) -> Self {
        Self::string_array(format!("{REFLECTION_PROMPT_PREFIX}\"{entry_text}\""))
    }

    pub fn prompt_text(&self) -> Option<&str> {
        self.contents.first()?.parts.first().map(|part| part.text.as_str())
    }
}

/// Success envelope `{ candidates: [{ content: { parts: [{ text }] } }] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub content: CandidateContent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Decode a raw response body into the envelope.
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(body)
            .map_err(|e| ApiError::parse(format!("invalid response envelope: {e}")))
    }

    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Result<&str, ApiError> {
        let candidate =
            self.candidates.first().ok_or_else(|| ApiError::parse("response has no candidates"))?;
        let part = candidate
            .content
            .parts
            .first()
            .ok_or_else(|| ApiError::parse("candidate content has no parts"))?;
        part.text.as_deref().ok_or_else(|| ApiError::parse("candidate part has no text"))
    }

    /// Inner text decoded as a JSON array of strings.
    pub fn string_array(&self) -> Result<Vec<String>, ApiError> {
        let text = self.first_text()?;
        serde_json::from_str::<Vec<String>>(text)
            .map_err(|e| ApiError::parse(format!("payload is not an array of strings: {e}")))
    }
}

/// Parse a raw success body straight to the string array payload.
pub fn parse_string_array(body: &[u8]) -> Result<Vec<String>, ApiError> {
    GenerateContentResponse::from_body(body)?.string_array()
}
