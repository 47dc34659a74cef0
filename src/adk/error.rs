// SPDX-License-Identifier: MIT

//! Typed error handling for raspian-rs
//!
//! Per-request failures (`FetchError`, `GenerationError`, `ToolError`) are
//! converted into a [`ToolResult`](crate::adk::tool::ToolResult) at the tool
//! boundary. `ConfigError` is the only one allowed to abort the process.

use thiserror::Error;

/// Failures while fetching grounding text from the search engine
#[derive(Debug, Error)]
pub enum FetchError {
    /// The search URL could not be assembled
    #[error("Web scraping failed: invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure, including the request timeout
    #[error("Web scraping failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The search engine answered with a non-success status
    #[error("Web scraping failed: HTTP status {0}")]
    Status(reqwest::StatusCode),

    /// The returned document has no paragraph elements
    #[error("Web scraping failed: No content found on the page.")]
    NoContent,

    /// Free-form cause, displayed verbatim
    #[error("{0}")]
    Other(String),
}

/// Failures from the completion API
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport failure, including the optional completion timeout
    #[error("OpenAI API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status (auth, quota, bad request...)
    #[error("OpenAI API request failed: HTTP {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response did not carry a usable completion
    #[error("OpenAI API request failed: invalid response: {0}")]
    InvalidResponse(String),

    /// Free-form cause, displayed verbatim
    #[error("{0}")]
    Other(String),
}

/// Errors raised while running a tool
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing '{name}' parameter for {tool} tool.")]
    MissingParameter { tool: String, name: String },

    #[error("Invalid '{name}' parameter: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set in the environment variables.")]
    MissingVar(String),

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidVar {
        name: String,
        value: String,
        reason: String,
    },
}

impl FetchError {
    /// Create a free-form fetch error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl GenerationError {
    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Create a free-form generation error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl ToolError {
    /// Create a missing parameter error
    pub fn missing_parameter(tool: impl Into<String>, name: impl Into<String>) -> Self {
        Self::MissingParameter {
            tool: tool.into(),
            name: name.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's input rather than a dependency
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }
}

impl ConfigError {
    /// Create an invalid variable error
    pub fn invalid(
        name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidVar {
            name: name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
