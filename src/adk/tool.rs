// SPDX-License-Identifier: MIT

use crate::adk::error::ToolError;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Out-of-band outcome of a tool invocation, used by transports to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolStatus {
    #[default]
    Success,
    /// Bad input from the caller (missing or invalid parameters, unknown tool)
    ClientError,
    /// A dependency failed (search fetch, completion call)
    ServerError,
}

/// Uniform result of a tool invocation.
///
/// On success `message` holds the payload; on failure it is empty and
/// `description` explains why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolResult {
    /// The generated blog post.
    pub message: String,
    /// Operation status.
    pub description: String,
    #[serde(skip)]
    pub status: ToolStatus,
}

impl ToolResult {
    pub fn success(message: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            description: description.into(),
            status: ToolStatus::Success,
        }
    }

    pub fn client_error(description: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            description: description.into(),
            status: ToolStatus::ClientError,
        }
    }

    pub fn server_error(description: impl Into<String>) -> Self {
        Self {
            message: String::new(),
            description: description.into(),
            status: ToolStatus::ServerError,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        if err.is_client_error() {
            Self::client_error(err.to_string())
        } else {
            Self::server_error(format!("Error: {}", err))
        }
    }
}

/// Static metadata describing a registered tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub output: Value,
}

/// Trait for tools exposed to an agent host.
///
/// `name()`, `description()` and the schemas return borrowed values;
/// implementations should keep them in fields or statics.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool name (must be unique within a registry)
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does
    fn description(&self) -> &str;

    /// Returns the JSON schema for the tool's input parameters
    fn schema(&self) -> &Value;

    /// Returns the JSON schema of the tool's result
    fn output_schema(&self) -> &Value;

    /// Run the tool. Failures are reported inside the returned result, never raised.
    async fn invoke(&self, parameters: Value) -> ToolResult;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.schema().clone(),
            output: self.output_schema().clone(),
        }
    }
}
