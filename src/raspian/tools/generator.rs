// SPDX-License-Identifier: MIT

//! Blog post text from a completion model

use crate::adk::error::GenerationError;
use crate::adk::model::{Content, GenerationConfig, Model};
use async_trait::async_trait;
use std::sync::Arc;

pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that writes blog posts in R Markdown format.";

/// Produces text for a topic given grounding content
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, topic: &str, grounding: &str) -> Result<String, GenerationError>;
}

/// Asks a [`Model`] for a short R Markdown blog post.
pub struct BlogPostGenerator {
    model: Arc<dyn Model>,
    config: GenerationConfig,
}

impl BlogPostGenerator {
    pub fn new(model: Arc<dyn Model>) -> Self {
        Self {
            model,
            config: Self::sampling(),
        }
    }

    /// Fixed sampling parameters for every request
    pub fn sampling() -> GenerationConfig {
        GenerationConfig {
            temperature: Some(0.7),
            max_output_tokens: Some(300),
            top_p: Some(1.0),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(0.0),
        }
    }

    /// System instruction plus a user message embedding the grounding verbatim
    pub fn build_prompt(topic: &str, grounding: &str) -> Vec<Content> {
        vec![
            Content::system(SYSTEM_INSTRUCTION),
            Content::user(format!(
                "Write a short blog post in R Markdown format about the topic '{}'. \
                 Use the following data as inspiration: {}",
                topic, grounding
            )),
        ]
    }
}

#[async_trait]
impl TextGenerator for BlogPostGenerator {
    async fn generate_text(&self, topic: &str, grounding: &str) -> Result<String, GenerationError> {
        let history = Self::build_prompt(topic, grounding);

        let response = self
            .model
            .generate_content(&history, Some(&self.config))
            .await
            .map_err(|e| {
                log::debug!("Completion for topic '{}' failed: {}", topic, e);
                e
            })?;

        let text = response.text().trim().to_string();
        if text.is_empty() {
            log::debug!("Completion for topic '{}' was empty", topic);
            return Err(GenerationError::invalid_response("empty completion"));
        }

        Ok(text)
    }
}
