// SPDX-License-Identifier: MIT

//! Minimal MCP (JSON-RPC 2.0 over HTTP POST) endpoint.
//!
//! Stateless: no sessions, no server-initiated messages. Supports
//! `initialize`, `ping`, `tools/list` and `tools/call`; notifications are
//! acknowledged with `202 Accepted`.

use crate::adk::tool::{ToolDescriptor, ToolResult};
use crate::raspian::registry::{Dispatch, ToolRegistry};
use serde::Serialize;
use serde_json::{json, Map, Value};

pub const PROTOCOL_VERSION: &str = "2025-06-18";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Tool as advertised by `tools/list`
#[derive(Debug, Serialize)]
struct McpTool<'a> {
    name: &'a str,
    description: &'a str,
    #[serde(rename = "inputSchema")]
    input_schema: &'a Value,
    #[serde(rename = "outputSchema")]
    output_schema: &'a Value,
}

impl<'a> From<&'a ToolDescriptor> for McpTool<'a> {
    fn from(descriptor: &'a ToolDescriptor) -> Self {
        Self {
            name: &descriptor.name,
            description: &descriptor.description,
            input_schema: &descriptor.parameters,
            output_schema: &descriptor.output,
        }
    }
}

/// Identity reported by `initialize`
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Handle one decoded JSON-RPC message. `None` means it was a notification.
pub async fn handle_message(
    registry: &ToolRegistry,
    info: &ServerInfo,
    message: Value,
) -> Option<JsonRpcResponse> {
    let Value::Object(mut message) = message else {
        return Some(JsonRpcResponse::error(
            Value::Null,
            JsonRpcError::new(INVALID_REQUEST, "Batch and non-object requests are not supported"),
        ));
    };

    let id = message.remove("id");
    let method = match message.get("method").and_then(Value::as_str) {
        Some(method) => method.to_string(),
        None => {
            return Some(JsonRpcResponse::error(
                id.unwrap_or(Value::Null),
                JsonRpcError::new(INVALID_REQUEST, "Missing 'method'"),
            ))
        }
    };
    let params = message.remove("params").unwrap_or(Value::Null);

    let Some(id) = id else {
        log::debug!("MCP notification: {}", method);
        return None;
    };

    log::debug!("MCP request {}: {}", id, method);

    let outcome = match method.as_str() {
        "initialize" => Ok(initialize(info, &params)),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(list_tools(registry)),
        "tools/call" => call_tool(registry, params).await,
        other => Err(JsonRpcError::new(
            METHOD_NOT_FOUND,
            format!("Method not found: {}", other),
        )),
    };

    Some(match outcome {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(error) => JsonRpcResponse::error(id, error),
    })
}

/// Response for a body that is not valid JSON
pub fn parse_error(detail: impl std::fmt::Display) -> JsonRpcResponse {
    JsonRpcResponse::error(
        Value::Null,
        JsonRpcError::new(PARSE_ERROR, format!("Parse error: {}", detail)),
    )
}

fn initialize(info: &ServerInfo, params: &Value) -> Value {
    let protocol_version = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(PROTOCOL_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": info.name,
            "version": info.version
        }
    })
}

fn list_tools(registry: &ToolRegistry) -> Value {
    let descriptors = registry.descriptors();
    let tools: Vec<McpTool<'_>> = descriptors.iter().map(McpTool::from).collect();
    json!({ "tools": tools })
}

async fn call_tool(registry: &ToolRegistry, params: Value) -> Result<Value, JsonRpcError> {
    let Value::Object(mut params) = params else {
        return Err(JsonRpcError::new(INVALID_PARAMS, "Missing params for tools/call"));
    };

    let name = match params.remove("name") {
        Some(Value::String(name)) => name,
        _ => return Err(JsonRpcError::new(INVALID_PARAMS, "Missing tool 'name'")),
    };

    let arguments = match params.remove("arguments") {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(Value::Object(arguments)) => Value::Object(arguments),
        Some(_) => {
            return Err(JsonRpcError::new(
                INVALID_PARAMS,
                "'arguments' must be a JSON object",
            ))
        }
    };

    match registry.dispatch(&name, arguments).await {
        Dispatch::Completed(result) => Ok(call_tool_result(&result)),
        Dispatch::NotFound { tool, available } => Err(JsonRpcError::new(
            INVALID_PARAMS,
            format!("Unknown tool: {}", tool),
        )
        .with_data(json!({ "available_tools": available }))),
    }
}

/// Text content for humans plus the structured `{message, description}` pair
fn call_tool_result(result: &ToolResult) -> Value {
    let text = if result.is_success() {
        &result.message
    } else {
        &result.description
    };

    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": result,
        "isError": !result.is_success()
    })
}
