//! HTTP Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use agent_core::{Agent, AgentError, AgentConfig, ToolDescriptor, ToolResult};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub agent: String,
    pub provider_connected: bool,
    pub tools: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
    pub agent: String,
    pub model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        agent: state.agent.name.clone(),
        provider_connected,
        tools: state.tools.len(),
    })
}

/// Tool descriptors in registration order
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolDescriptor>> {
    Json(state.tools.descriptors())
}

/// Invoke one tool directly; the body is its argument object (may be empty)
pub async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolResult>, ApiError> {
    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            api_error(StatusCode::BAD_REQUEST, "INVALID_ARGUMENTS", e.to_string())
        })?
    };

    let result = state.tools.dispatch(&name, args).await.map_err(|e| match &e {
        AgentError::ToolNotFound(_) => {
            api_error(StatusCode::NOT_FOUND, "UNKNOWN_TOOL", e.to_string())
        }
        AgentError::ToolValidation(_) => {
            api_error(StatusCode::BAD_REQUEST, "INVALID_ARGUMENTS", e.to_string())
        }
        _ => {
            tracing::error!(tool = %name, "Tool error: {}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "TOOL_ERROR", e.user_message())
        }
    })?;

    Ok(Json(result))
}

/// Main chat endpoint
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut config = AgentConfig::clone(&state.agent);
    if let Some(model) = payload.model {
        config.generation.model = model;
    }
    let model = config.generation.model.clone();
    let agent_name = config.name.clone();

    let agent = Agent::new(state.provider.clone(), Arc::clone(&state.tools), config);

    let response = agent.ask(&payload.message).await.map_err(|e| {
        tracing::error!(agent = %agent_name, "Agent error: {}", e);
        let status = if e.is_registry_error() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_GATEWAY
        };
        api_error(status, "AGENT_ERROR", e.user_message())
    })?;

    let conversation_id = payload
        .conversation_id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    Ok(Json(ChatResponse {
        message: response,
        conversation_id,
        agent: agent_name,
        model,
    }))
}
