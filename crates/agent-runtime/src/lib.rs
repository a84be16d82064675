//! # agent-runtime
//!
//! Model provider clients for the agent loop.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Generative Language API, keyed by `GOOGLE_API_KEY`
//! - **Ollama** (feature `ollama`): local inference via Ollama
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::GeminiProvider;
//!
//! let provider = GeminiProvider::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, LlmProvider, Message, Result, Role};
