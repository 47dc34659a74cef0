// SPDX-License-Identifier: MIT

use crate::adk::error::ToolError;
use crate::adk::tool::{Tool, ToolResult};
use crate::raspian::tools::generator::TextGenerator;
use crate::raspian::tools::scraper::ContentFetcher;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const BLOGPOST_TOOL: &str = "blogpost";
pub const SUCCESS_DESCRIPTION: &str = "Blog post generated successfully.";

// --- Static schemas ---

static BLOGPOST_SCHEMA: Lazy<Value> = Lazy::new(|| schema_value(schema_for!(BlogpostArgs)));

static BLOGPOST_OUTPUT_SCHEMA: Lazy<Value> = Lazy::new(|| schema_value(schema_for!(ToolResult)));

fn schema_value(schema: schemars::schema::RootSchema) -> Value {
    serde_json::to_value(schema).unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BlogpostArgs {
    /// The topic to write the blog post about.
    pub topic: String,
}

/// Fetches grounding text for a topic, then asks the generator for a post.
///
/// Every failure is folded into the returned [`ToolResult`].
pub struct BlogpostTool {
    fetcher: Arc<dyn ContentFetcher>,
    generator: Arc<dyn TextGenerator>,
}

impl BlogpostTool {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { fetcher, generator }
    }

    /// Run the pipeline for an already extracted topic
    pub async fn run(&self, topic: &str) -> ToolResult {
        if topic.trim().is_empty() {
            return ToolError::invalid_parameter("topic", "expected a non-empty string").into();
        }

        log::info!("Scraping web for topic: {}", topic);

        match self.generate(topic).await {
            Ok(post) => ToolResult::success(post, SUCCESS_DESCRIPTION),
            Err(e) => {
                log::error!("Blog post generation failed: {}", e);
                e.into()
            }
        }
    }

    async fn generate(&self, topic: &str) -> Result<String, ToolError> {
        let grounding = self.fetcher.fetch_grounding_text(topic).await?;
        let post = self.generator.generate_text(topic, &grounding).await?;
        Ok(post)
    }

    fn topic_from(parameters: &Value) -> Result<&str, ToolError> {
        match parameters.get("topic") {
            None | Some(Value::Null) => Err(ToolError::missing_parameter(BLOGPOST_TOOL, "topic")),
            Some(Value::String(topic)) => Ok(topic.as_str()),
            Some(_) => Err(ToolError::invalid_parameter(
                "topic",
                "expected a non-empty string",
            )),
        }
    }
}

#[async_trait]
impl Tool for BlogpostTool {
    fn name(&self) -> &str {
        BLOGPOST_TOOL
    }

    fn description(&self) -> &str {
        "Generate a short blog post in R Markdown format about a given topic."
    }

    fn schema(&self) -> &Value {
        &BLOGPOST_SCHEMA
    }

    fn output_schema(&self) -> &Value {
        &BLOGPOST_OUTPUT_SCHEMA
    }

    async fn invoke(&self, parameters: Value) -> ToolResult {
        match Self::topic_from(&parameters) {
            Ok(topic) => self.run(topic).await,
            Err(e) => {
                log::warn!("Rejected blogpost invocation: {}", e);
                e.into()
            }
        }
    }
}
