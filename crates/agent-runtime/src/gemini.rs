//! Gemini LLM Provider
//!
//! `LlmProvider` over the Generative Language REST API (`generateContent`).
//! Tool use stays prompt-based, so only text parts are exchanged.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini provider configuration
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,

    /// API root, up to and including the version segment
    pub base_url: String,

    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            timeout_secs: 120,
        }
    }

    /// `GOOGLE_API_KEY` is required; `GEMINI_BASE_URL` and `GEMINI_MODEL`
    /// are optional overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GOOGLE_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AgentError::Config("GOOGLE_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("GEMINI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        Ok(config)
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Model used when the caller does not pick one
    pub fn default_model(&self) -> &str {
        &self.config.model
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(body),
            StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(body),
            s if s.is_server_error() => AgentError::ProviderUnavailable(format!("{s}: {body}")),
            s => AgentError::Provider(format!("{s}: {body}")),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    display_name: Option<String>,
    input_token_limit: Option<u32>,
}

/// Map the conversation onto Gemini's system instruction plus
/// alternating `user`/`model` contents. Tool results appear as user context.
fn build_request(messages: &[Message], options: &GenerationOptions) -> GenerateRequest {
    let mut system_parts = Vec::new();
    let mut contents: Vec<Content> = Vec::new();

    for message in messages {
        let part = Part {
            text: Some(message.content.clone()),
        };
        let role = match message.role {
            Role::System => {
                system_parts.push(part);
                continue;
            }
            Role::User | Role::Tool => "user",
            Role::Assistant => "model",
        };

        match contents.last_mut() {
            Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
            _ => contents.push(Content {
                role: Some(role.into()),
                parts: vec![part],
            }),
        }
    }

    GenerateRequest {
        system_instruction: (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        }),
        contents,
        generation_config: GenerationConfig {
            temperature: options.temperature,
            top_p: options.top_p,
            max_output_tokens: options.max_tokens,
            stop_sequences: options.stop_sequences.clone(),
        },
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Other,
    }
}

fn into_completion(response: GenerateResponse, model: &str) -> Result<Completion> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::Provider("Gemini returned no candidates".into()))?;

    let content = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(Completion {
        content,
        model: model.to_string(),
        usage: response.usage_metadata.map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        }),
        finish_reason: candidate.finish_reason.as_deref().map(map_finish_reason),
    })
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Gemini".into(),
            models,
            supports_tools: false, // tool calls go through the prompt protocol
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, options.model
        );
        let body = build_request(messages, options);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let parsed: GenerateResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        into_completion(parsed, &options.model)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .http
            .get(format!("{}/models", self.config.base_url))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| AgentError::ProviderUnavailable(e.to_string()))?;

        let parsed: ListModelsResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Provider(e.to_string()))?;

        Ok(parsed
            .models
            .into_iter()
            .map(|m| {
                let id = m.name.trim_start_matches("models/").to_string();
                ModelInfo {
                    name: m.display_name.unwrap_or_else(|| id.clone()),
                    id,
                    context_length: m.input_token_limit,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<GeminiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        GeminiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_requires_api_key() {
        assert!(matches!(config_from(&[]), Err(AgentError::Config(_))));
        assert!(matches!(
            config_from(&[("GOOGLE_API_KEY", "   ")]),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_config_env_overrides() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "k-123"),
            ("GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
        ])
        .unwrap();

        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.base_url, "http://localhost:8080/v1beta");
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_config_defaults_without_overrides() {
        let config = config_from(&[("GOOGLE_API_KEY", "k-123")]).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_config_debug_hides_key() {
        let config = GeminiConfig::new("secret-key");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![
            Message::system("You are an agent."),
            Message::user("Capital of Japan?"),
            Message::assistant("```tool\n{}\n```"),
            Message::tool("[Tool 'get_capital_city' returned]", None),
            Message::user("And the temperature?"),
        ];
        let options = GenerationOptions::default();

        let body = serde_json::to_value(build_request(&messages, &options)).unwrap();

        assert_eq!(
            body["systemInstruction"],
            json!({"parts": [{"text": "You are an agent."}]})
        );
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"].as_array().unwrap().len(), 2);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert!(body["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_completion_from_response() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "The capital "}, {"text": "is Tokyo."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
        }))
        .unwrap();

        let completion = into_completion(response, "gemini-2.5-flash").unwrap();
        assert_eq!(completion.content, "The capital is Tokyo.");
        assert_eq!(completion.finish_reason, Some(FinishReason::Stop));
        assert_eq!(completion.usage.unwrap().total_tokens, 17);
    }

    #[test]
    fn test_empty_candidates_is_provider_error() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            into_completion(response, "m"),
            Err(AgentError::Provider(_))
        ));
    }

    #[test]
    fn test_finish_reason_mapping() {
        assert_eq!(map_finish_reason("MAX_TOKENS"), FinishReason::Length);
        assert_eq!(map_finish_reason("SAFETY"), FinishReason::ContentFilter);
        assert_eq!(map_finish_reason("SOMETHING_NEW"), FinishReason::Other);
    }
}
