//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction and a typed tool
//! registry.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tools implement [`TypedTool`] with their own argument struct; the
//! [`ToolRegistry`] decodes the model's raw JSON into it at dispatch time.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::LlmProvider;
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use tool::{
    NoArgs, ParameterSchema, ResultStatus, Tool, ToolCall, ToolDescriptor, ToolRegistry,
    ToolResult, ToolSchema, TypedTool,
};
