//! Reflective prompts produced for a saved entry

use serde::{Deserialize, Serialize};

/// Ordered reflective questions. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptSet(Vec<String>);

impl PromptSet {
    pub fn new(prompts: Vec<String>) -> Self {
        Self(prompts)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for PromptSet {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}
