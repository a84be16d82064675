//! Tool System
//!
//! Tools are registered once at startup and dispatched by name, either by the
//! reasoning loop or directly by a front end. Arguments arrive as untyped JSON
//! and are decoded into each tool's own input struct exactly once, in
//! [`TypedTool`]'s blanket [`Tool`] impl.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(alias = "tool")]
    pub name: String,

    /// Raw argument object as issued by the model
    #[serde(default)]
    pub arguments: Value,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
            id: None,
        }
    }
}

/// Outcome kind of a tool invocation.
///
/// The conversation only ever sees the `result` text; the status lets
/// programmatic callers tell a miss from a failure without string matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Found,
    NotFound,
    Failed,
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub status: ResultStatus,

    /// Human-readable answer or apology
    pub result: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ToolResult {
    fn new(name: impl Into<String>, status: ResultStatus, result: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            status,
            result: result.into(),
            data: None,
        }
    }

    pub fn found(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self::new(name, ResultStatus::Found, result)
    }

    pub fn not_found(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self::new(name, ResultStatus::NotFound, result)
    }

    pub fn failure(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self::new(name, ResultStatus::Failed, result)
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// The `{ "result": ... }` object handed back to the model
    pub fn payload(&self) -> Value {
        json!({ "result": self.result })
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl ParameterSchema {
    /// A required string parameter
    pub fn required_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
            default: None,
            enum_values: None,
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

impl ToolSchema {
    /// Render the parameters as a JSON Schema object
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = json!({
                "type": param.param_type,
                "description": param.description,
            });
            if let Some(default) = &param.default {
                property["default"] = default.clone();
            }
            if let Some(values) = &param.enum_values {
                property["enum"] = Value::Array(values.clone());
            }
            if param.required {
                required.push(Value::String(param.name.clone()));
            }
            properties.insert(param.name.clone(), property);
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema(),
        }
    }
}

/// What the model (or any front end) learns about a tool
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tool trait - the object-safe form stored in the registry
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with raw JSON arguments
    async fn call(&self, args: Value) -> Result<ToolResult>;

    /// Validate arguments before execution (optional)
    fn validate(&self, args: &Value) -> Result<()> {
        let schema = self.schema();

        let object = match args {
            Value::Null => None,
            Value::Object(map) => Some(map),
            other => {
                return Err(AgentError::ToolValidation(format!(
                    "Arguments for {} must be an object, got {other}",
                    schema.name
                )));
            }
        };

        for param in schema.parameters.iter().filter(|p| p.required) {
            if !object.is_some_and(|map| map.contains_key(&param.name)) {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// A tool with a typed input contract.
///
/// Implement this instead of [`Tool`]; the blanket impl decodes the raw
/// arguments into `Args` before `run` is called.
#[async_trait]
pub trait TypedTool: Send + Sync {
    type Args: DeserializeOwned + Send;

    fn definition(&self) -> ToolSchema;

    async fn run(&self, args: Self::Args) -> ToolResult;
}

#[async_trait]
impl<T> Tool for T
where
    T: TypedTool,
{
    fn schema(&self) -> ToolSchema {
        self.definition()
    }

    async fn call(&self, args: Value) -> Result<ToolResult> {
        let args = decode_args::<T::Args>(&self.definition().name, args)?;
        Ok(self.run(args).await)
    }
}

/// Arguments of a tool that takes none
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct NoArgs {}

/// Decode raw arguments into a typed struct. `null` counts as `{}`.
pub fn decode_args<A: DeserializeOwned>(tool: &str, args: Value) -> Result<A> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args)
        .map_err(|e| AgentError::ToolValidation(format!("Invalid arguments for {tool}: {e}")))
}

/// Registry for available tools, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool. Names must be unique.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.schema().name;
        if self.index.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// Look up a tool, validate and decode the arguments, and run it
    pub async fn dispatch(&self, name: &str, args: Value) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tool.validate(&args)?;

        tracing::debug!(tool = %name, "Dispatching tool");
        tool.call(args).await
    }

    /// Execute a model-issued tool call, carrying its id onto the result
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let mut result = self.dispatch(&call.name, call.arguments.clone()).await?;
        result.id.clone_from(&call.id);
        Ok(result)
    }

    /// Get all tool schemas
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|t| t.schema()).collect()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.schema().descriptor()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.schema().name).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Generate system prompt section describing available tools
    pub fn generate_prompt_section(&self) -> String {
        use std::fmt::Write;

        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can use the following tools by responding with a JSON block:\n\n");
        prompt.push_str(
            "```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"arg\": \"value\"}}\n```\n\n",
        );
        prompt.push_str("You may emit several tool blocks in one reply.\n\n");

        for schema in self.schemas() {
            let _ = writeln!(prompt, "### {}", schema.name);
            let _ = writeln!(prompt, "{}", schema.description);

            if !schema.parameters.is_empty() {
                prompt.push_str("**Parameters:**\n");
                for param in &schema.parameters {
                    let required = if param.required { " (required)" } else { "" };
                    let _ = writeln!(
                        prompt,
                        "- `{}` ({}){}: {}",
                        param.name, param.param_type, required, param.description
                    );
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}
