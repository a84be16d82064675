//! Application State

use std::sync::Arc;

use agent_core::{AgentConfig, LlmProvider, ToolRegistry};

/// Shared application state, read-only after startup
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Gemini, Ollama)
    pub provider: Arc<dyn LlmProvider>,

    /// Tool registry with all available tools
    pub tools: Arc<ToolRegistry>,

    /// Identity, instruction and generation settings of the agent
    pub agent: Arc<AgentConfig>,
}
