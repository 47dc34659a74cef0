// SPDX-License-Identifier: MIT

pub mod mcp;
pub mod request;

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::adk::tool::{ToolResult, ToolStatus};
use crate::raspian::config::{Config, ServerConfig};
use crate::raspian::registry::{Dispatch, ToolRegistry};
use crate::raspian::tools::create_tools;
use mcp::ServerInfo;
use request::Invocation;

pub const SERVER_NAME: &str = "raspian";

pub const HEALTH_ROUTE: &str = "/api/health";
pub const TOOLS_ROUTE: &str = "/tools";
pub const INVOKE_ROUTE: &str = "/invoke";

/// REST routes mounted beside the MCP endpoint
pub const REST_ROUTES: [&str; 3] = [HEALTH_ROUTE, TOOLS_ROUTE, INVOKE_ROUTE];

#[derive(Clone)]
struct AppState {
    registry: Arc<ToolRegistry>,
    info: Arc<ServerInfo>,
}

/// HTTP front end over a fixed set of tools
pub struct RaspianServer {
    info: ServerInfo,
    registry: Arc<ToolRegistry>,
    mcp_path: String,
}

/// Build the server with every tool this process offers
pub fn create_server(config: &Config, client: Client) -> RaspianServer {
    let registry = ToolRegistry::with_tools(create_tools(config, client));
    RaspianServer::new(registry).with_mcp_path(config.server.path.clone())
}

impl RaspianServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            registry: Arc::new(registry),
            mcp_path: ServerConfig::default().path,
        }
    }

    pub fn with_mcp_path(mut self, path: impl Into<String>) -> Self {
        self.mcp_path = path.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn router(&self) -> Router {
        let state = AppState {
            registry: self.registry.clone(),
            info: Arc::new(self.info.clone()),
        };

        Router::new()
            .route(HEALTH_ROUTE, get(health_check))
            .route(TOOLS_ROUTE, get(list_tools))
            .route(INVOKE_ROUTE, post(invoke_tool))
            .route(&self.mcp_path, post(mcp_endpoint))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    pub async fn serve(self, config: &ServerConfig) -> std::io::Result<()> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        self.serve_with_listener(listener).await
    }

    pub async fn serve_with_listener(self, listener: TcpListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        log::info!(
            "{} listening on http://{} (tools: {}, MCP endpoint: {})",
            self.info.name,
            addr,
            self.tool_names().join(", "),
            self.mcp_path
        );

        axum::serve(listener, self.router()).await
    }
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "available_tools": state.registry.descriptors() }))
}

async fn invoke_tool(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> (StatusCode, Json<ToolResult>) {
    let Json(body) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            log::warn!("Rejected /invoke body: {}", rejection.body_text());
            let result =
                ToolResult::client_error(format!("Invalid request body: {}", rejection.body_text()));
            return (StatusCode::BAD_REQUEST, Json(result));
        }
    };
    log::debug!("/invoke body: {}", body);

    let invocation = match Invocation::from_value(body) {
        Ok(invocation) => invocation,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ToolResult::client_error(e.to_string())),
            )
        }
    };

    match state
        .registry
        .dispatch(&invocation.tool, invocation.parameters)
        .await
    {
        Dispatch::Completed(result) => (status_code(&result), Json(result)),
        not_found @ Dispatch::NotFound { .. } => {
            (StatusCode::NOT_FOUND, Json(not_found.into_result()))
        }
    }
}

async fn mcp_endpoint(State(state): State<AppState>, body: Bytes) -> Response {
    let message: Value = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            log::warn!("Unparseable MCP message: {}", e);
            return (StatusCode::BAD_REQUEST, Json(mcp::parse_error(e))).into_response();
        }
    };

    match mcp::handle_message(&state.registry, &state.info, message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn status_code(result: &ToolResult) -> StatusCode {
    match result.status {
        ToolStatus::Success => StatusCode::OK,
        ToolStatus::ClientError => StatusCode::BAD_REQUEST,
        ToolStatus::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
