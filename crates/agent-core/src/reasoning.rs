//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern: the model either answers or
//! asks for tools, the tools run, their results go back into the conversation.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Agent identifier, used in logs and responses
    pub name: String,

    /// One-line summary of what the agent answers
    pub description: String,

    /// Instruction placed at the top of the system prompt
    pub instruction: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,

    /// Deadline for a single tool call; `None` leaves it unbounded
    pub tool_timeout: Option<Duration>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "assistant".into(),
            description: "A helpful AI assistant.".into(),
            instruction: DEFAULT_INSTRUCTION.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
            tool_timeout: Some(Duration::from_secs(30)),
        }
    }
}

const DEFAULT_INSTRUCTION: &str = "You are a helpful AI assistant.";

const TOOL_PROTOCOL: &str = r#"When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

const TOOL_BLOCK_START: &str = "```tool";
const TOOL_BLOCK_END: &str = "```";

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Build the full system prompt including tool descriptions
    pub fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.instruction.clone();

        if !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(TOOL_PROTOCOL);

            if self.config.inject_tool_descriptions {
                prompt.push_str("\n\n");
                prompt.push_str(&self.tools.generate_prompt_section());
            }
        }

        prompt
    }

    /// Run the agent until the model replies without asking for a tool
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        conversation.ensure_system_prompt(|| self.build_system_prompt());

        for iteration in 1..=self.config.max_iterations {
            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content;
            conversation.push(Message::assistant(&content));

            let calls = parse_tool_calls(&content);
            if calls.is_empty() {
                return Ok(content);
            }

            tracing::debug!(
                agent = %self.config.name,
                iteration,
                calls = calls.len(),
                "Executing tool calls"
            );

            // Calls from one turn are independent of each other
            let outcomes = join_all(calls.iter().map(|call| self.execute_tool(call))).await;

            for (call, outcome) in calls.iter().zip(outcomes) {
                conversation.push(Message::tool(outcome?, call.id.clone()));
            }
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Run one call and render the message fed back to the model.
    ///
    /// Registry errors abort the run; every other failure is reported to the
    /// model so it can correct itself.
    async fn execute_tool(&self, call: &ToolCall) -> Result<String> {
        let outcome = match self.config.tool_timeout {
            Some(limit) => tokio::time::timeout(limit, self.tools.execute(call))
                .await
                .unwrap_or_else(|_| {
                    Err(AgentError::ToolTimeout {
                        name: call.name.clone(),
                        millis: limit.as_millis(),
                    })
                }),
            None => self.tools.execute(call).await,
        };

        match outcome {
            Ok(result) => Ok(format_tool_result(&result)),
            Err(e) if e.is_registry_error() => {
                tracing::error!(agent = %self.config.name, tool = %call.name, "{e}");
                Err(e)
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                Ok(format!(
                    "[Tool '{}' failed]\n{}",
                    call.name,
                    serde_json::json!({ "error": e.to_string() })
                ))
            }
        }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

fn format_tool_result(result: &ToolResult) -> String {
    format!("[Tool '{}' returned]\n{}", result.name, result.payload())
}

/// Extract every tool call from a model reply.
///
/// Fenced ` ```tool ` blocks are preferred; a bare JSON object with a
/// `"tool"` key is accepted when no block is present.
pub fn parse_tool_calls(content: &str) -> Vec<ToolCall> {
    let mut calls = Vec::new();
    let mut rest = content;

    while let Some(start_idx) = rest.find(TOOL_BLOCK_START) {
        let after_marker = &rest[start_idx + TOOL_BLOCK_START.len()..];
        let Some(end_idx) = after_marker.find(TOOL_BLOCK_END) else {
            break;
        };

        let json_str = after_marker[..end_idx].trim();
        match serde_json::from_str::<ToolCall>(json_str) {
            Ok(call) => calls.push(call),
            Err(e) => tracing::debug!(error = %e, "Ignoring malformed tool block"),
        }

        rest = &after_marker[end_idx + TOOL_BLOCK_END.len()..];
    }

    if calls.is_empty() {
        calls.extend(parse_inline_tool_call(content));
    }

    for call in &mut calls {
        if call.id.is_none() {
            call.id = Some(uuid::Uuid::new_v4().to_string());
        }
    }

    calls
}

fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: Arc::new(ToolRegistry::new()),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = description.into();
        self
    }

    #[must_use]
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.config.instruction = instruction.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    #[must_use]
    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    #[must_use]
    pub const fn tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, self.tools, self.config))
    }
}
