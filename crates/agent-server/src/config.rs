//! Server Configuration
//!
//! Everything comes from the environment (optionally via `.env`).

use std::str::FromStr;
use std::time::Duration;

use agent_core::{AgentError, Result};

/// Which model backend drives the agent
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Ollama,
}

impl FromStr for ProviderKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(AgentError::Config(format!(
                "Unknown MODEL_PROVIDER '{other}' (expected 'gemini' or 'ollama')"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,

    /// `MODEL_PROVIDER`
    pub provider: ProviderKind,

    /// `MODEL`; falls back to the provider's default
    pub model: Option<String>,

    /// `AGENT_TOOL_TIMEOUT_SECS`; 0 disables the per-tool deadline
    pub tool_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            provider: ProviderKind::Gemini,
            model: None,
            tool_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let provider = lookup("MODEL_PROVIDER")
            .map(|v| v.parse::<ProviderKind>())
            .transpose()?
            .unwrap_or(defaults.provider);

        let tool_timeout = match lookup("AGENT_TOOL_TIMEOUT_SECS") {
            None => defaults.tool_timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    return Err(AgentError::Config(format!(
                        "AGENT_TOOL_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                    )));
                }
            },
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            provider,
            model: lookup("MODEL").filter(|m| !m.trim().is_empty()),
            tool_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.tool_timeout, Some(Duration::from_secs(30)));
        assert!(config.model.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("MODEL_PROVIDER", "Ollama"),
            ("MODEL", "llama3.2"),
            ("AGENT_TOOL_TIMEOUT_SECS", "0"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.model.as_deref(), Some("llama3.2"));
        assert!(config.tool_timeout.is_none());
    }

    #[test]
    fn test_rejects_unknown_provider() {
        assert!(matches!(
            config(&[("MODEL_PROVIDER", "openai")]),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_bad_timeout() {
        assert!(config(&[("AGENT_TOOL_TIMEOUT_SECS", "soon")]).is_err());
    }
}
