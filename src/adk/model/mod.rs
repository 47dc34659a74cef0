// SPDX-License-Identifier: MIT

//! Model module - defines the completion model trait and shared types
//!
//! Implementations live in their own submodules:
//! - [openai] - OpenAI's chat completions API

pub mod openai;

use crate::adk::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling parameters for a single completion
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GenerationConfig {
    pub temperature: Option<f64>,
    pub max_output_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Parts of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Part {
    /// Regular text
    Text(String),
}

impl Content {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::Text(text.into())],
        }
    }

    /// Concatenated text of all parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| match part {
                Part::Text(t) => t.as_str(),
            })
            .collect()
    }
}

/// Core trait for completion model implementations
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate_content(
        &self,
        history: &[Content],
        config: Option<&GenerationConfig>,
    ) -> Result<Content, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_text_joins_parts() {
        let content = Content {
            role: "model".to_string(),
            parts: vec![Part::Text("Hello, ".into()), Part::Text("world".into())],
        };
        assert_eq!(content.text(), "Hello, world");
    }

    #[test]
    fn test_content_constructors() {
        assert_eq!(Content::system("rules").role, "system");
        assert_eq!(Content::user("question").text(), "question");
    }
}
