//! Agents
//!
//! An agent answers one request in at most two model calls: an optional
//! tool-selection call (only when it owns tools), then a response-synthesis
//! call that phrases the answer. Neither step can fail outward; every error
//! degrades to "no tool used" or to a canned reply.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::intent::Intent;
use crate::prompts;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::sanitize::strip_code_fences;
use crate::tool::{Parameters, Tool, ToolRegistry};

/// Keys accepted for the parameter bag, in lookup order.
///
/// Small models regularly misspell `entities`; each accepted misspelling is
/// listed here rather than matched loosely.
pub const ENTITY_KEYS: &[&str] = &["entities", "entieties", "entitites"];

/// Key some models wrap the real parameters in
pub const NESTED_INPUT_KEY: &str = "input";

/// Reply when synthesis fails and no tool result is available
pub const APOLOGY: &str = "I apologize, I'm having trouble responding.";

/// Intent name used when an agent is called without a classification
pub const UNKNOWN_INTENT: &str = "unknown";

const TOOL_SELECTION_MAX_TOKENS: u32 = 150;
const RESPONSE_MAX_TOKENS: u32 = 150;
const RESPONSE_TEMPERATURE: f32 = 0.7;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Options for the tool-selection call
    pub selection: GenerationOptions,

    /// Options for the response-synthesis call
    pub response: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            selection: GenerationOptions::deterministic(TOOL_SELECTION_MAX_TOKENS),
            response: GenerationOptions::sampling(RESPONSE_MAX_TOKENS, RESPONSE_TEMPERATURE),
        }
    }
}

/// The model's decision during tool selection
#[derive(Clone, Debug, PartialEq)]
pub struct ToolSelection {
    pub tool_name: String,
    pub parameters: Parameters,
}

/// Decode a tool-selection reply.
///
/// Fails when the sanitized text is not a JSON object or has no string
/// `tool_name`, or when its parameters are not an object (see
/// [`extract_parameters`]).
pub fn decode_tool_selection(raw: &str) -> Result<ToolSelection> {
    let cleaned = strip_code_fences(raw);
    let value: Value = serde_json::from_str(cleaned)?;

    let Value::Object(object) = value else {
        return Err(AgentError::Parse(format!(
            "tool selection is not a JSON object: {cleaned}"
        )));
    };

    let tool_name = match object.get("tool_name") {
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(AgentError::Parse(format!("'tool_name' is not a string: {other}")));
        }
        None => {
            return Err(AgentError::Parse(format!("missing 'tool_name': {cleaned}")));
        }
    };

    Ok(ToolSelection {
        tool_name,
        parameters: extract_parameters(&object)?,
    })
}

/// Pull the parameter bag out of a tool-selection object.
///
/// The first [`ENTITY_KEYS`] entry holding a non-empty value is used; it must
/// be an object, so a bare string such as `"entities": "25 + 17"` fails the
/// selection. An object under `input` replaces the bag (models sometimes
/// double-nest); a scalar under `input` becomes the only parameter.
pub fn extract_parameters(object: &serde_json::Map<String, Value>) -> Result<Parameters> {
    let bag = match ENTITY_KEYS
        .iter()
        .filter_map(|key| object.get(*key).map(|value| (*key, value)))
        .find(|(_, value)| !is_blank(value))
    {
        None => Parameters::new(),
        Some((_, Value::Object(map))) => map.clone(),
        Some((key, other)) => {
            return Err(AgentError::Parse(format!("'{key}' is not an object: {other}")));
        }
    };

    Ok(match bag.get(NESTED_INPUT_KEY) {
        Some(Value::Object(inner)) => inner.clone(),
        Some(scalar) => {
            let mut params = Parameters::new();
            params.insert(NESTED_INPUT_KEY.into(), scalar.clone());
            params
        }
        None => bag,
    })
}

/// Values treated as "no entities given"
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// A bounded-responsibility handler backed by the shared model
pub struct Agent {
    name: String,
    description: String,
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Agent {
    /// Create an agent with no tools
    pub fn new(name: impl Into<String>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            provider,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn builder(name: impl Into<String>, provider: Arc<dyn LlmProvider>) -> AgentBuilder {
        AgentBuilder::new(name, provider)
    }

    /// Add a tool this agent can use
    pub fn register_tool(&mut self, tool: Tool) {
        tracing::info!(agent = %self.name, tool = %tool.name(), "Registered tool");
        self.tools.register(tool);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Get the tool registry
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Handle a request: optionally run one tool, then phrase the reply
    pub async fn execute(&self, user_request: &str, intent: Option<&Intent>) -> String {
        let intent_name = intent.map_or(UNKNOWN_INTENT, |i| i.name.as_str());

        let tool_result = if self.tools.is_empty() {
            None
        } else {
            let result = self.select_tool(user_request, intent_name).await;
            tracing::info!(agent = %self.name, result = ?result, "Tool result");
            result
        };

        self.generate_response(user_request, intent_name, tool_result.as_deref())
            .await
    }

    /// Let the model pick one owned tool and run it.
    ///
    /// `None` means no tool ran: the reply was unusable, or named a tool this
    /// agent does not own.
    pub async fn select_tool(&self, user_request: &str, intent_name: &str) -> Option<String> {
        let prompt = prompts::tool_selection(user_request, &self.tools);

        let completion = match self.provider.generate(&prompt, &self.config.selection).await {
            Ok(completion) => completion,
            Err(e) => {
                tracing::error!(agent = %self.name, error = %e, "Tool use failed");
                return None;
            }
        };

        tracing::debug!(
            agent = %self.name,
            intent = %intent_name,
            response = %strip_code_fences(&completion.content),
            "Tool selection response"
        );

        let selection = match decode_tool_selection(&completion.content) {
            Ok(selection) => selection,
            Err(e) => {
                tracing::error!(agent = %self.name, error = %e, "Invalid tool selection response");
                return None;
            }
        };

        let tool = self.tools.get(&selection.tool_name)?;
        let output = tool.call(&selection.parameters);
        tracing::info!(
            agent = %self.name,
            tool = %selection.tool_name,
            parameters = ?selection.parameters,
            "Used tool"
        );
        Some(output)
    }

    async fn generate_response(
        &self,
        user_request: &str,
        intent_name: &str,
        tool_result: Option<&str>,
    ) -> String {
        let tool_result = tool_result.filter(|r| !r.trim().is_empty());

        let prompt = match tool_result {
            Some(result) => prompts::tool_response(user_request, result),
            None => prompts::conversational_response(user_request, intent_name),
        };

        match self.provider.generate(&prompt, &self.config.response).await {
            Ok(completion) => completion.content.trim().to_string(),
            Err(e) => {
                tracing::error!(agent = %self.name, error = %e, "Response generation failed");
                tool_result.unwrap_or(APOLOGY).to_string()
            }
        }
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    name: String,
    description: String,
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new(name: impl Into<String>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            provider,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: impl IntoIterator<Item = Tool>) -> Self {
        for tool in tools {
            self.tools.register(tool);
        }
        self
    }

    /// Model used for both of the agent's calls
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.config.selection.model.clone_from(&model);
        self.config.response.model = model;
        self
    }

    #[must_use]
    pub const fn response_temperature(mut self, temperature: f32) -> Self {
        self.config.response.temperature = temperature;
        self
    }

    #[must_use]
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Agent> {
        if self.name.trim().is_empty() {
            return Err(AgentError::Config("Agent name is required".into()));
        }

        tracing::info!(
            agent = %self.name,
            tools = self.tools.len(),
            "Agent initialized with shared model"
        );

        Ok(Agent {
            name: self.name,
            description: self.description,
            provider: self.provider,
            tools: self.tools,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use serde_json::json;

    fn adder() -> Tool {
        Tool::new("adder", "Adds two numbers", |params: &Parameters| {
            let input = params
                .get("input")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow::anyhow!("missing input"))?;
            Ok(format!("{input} = 42"))
        })
        .with_parameter("input", "Expression (e.g., '25 + 17')")
    }

    fn failing() -> Tool {
        Tool::new("failing", "Always fails", |_: &Parameters| {
            anyhow::bail!("boom")
        })
    }

    fn agent(provider: Arc<ScriptedProvider>) -> Agent {
        Agent::builder("Calculator Agent", provider)
            .description("Solves math problems")
            .tools([adder(), failing()])
            .build()
            .unwrap()
    }

    fn object(value: Value) -> serde_json::Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_decode_requires_tool_name() {
        assert!(decode_tool_selection(r#"{"entities": {"input": "1 + 1"}}"#).is_err());
        assert!(decode_tool_selection("not json").is_err());
        assert!(decode_tool_selection(r#"["adder"]"#).is_err());
        assert!(decode_tool_selection(r#"{"tool_name": 3}"#).is_err());
    }

    #[test]
    fn test_decode_fenced_selection() {
        let raw = "```json\n{\"tool_name\": \"adder\", \"entities\": {\"input\": \"1 + 1\"}}\n```";
        let selection = decode_tool_selection(raw).unwrap();
        assert_eq!(selection.tool_name, "adder");
        assert_eq!(selection.parameters.get("input"), Some(&json!("1 + 1")));
    }

    #[test]
    fn test_entity_key_synonyms() {
        for key in ENTITY_KEYS {
            let mut selection = serde_json::Map::new();
            selection.insert((*key).to_string(), json!({"input": "2 * 3"}));
            let params = extract_parameters(&selection).unwrap();
            assert_eq!(params.get("input"), Some(&json!("2 * 3")), "key {key}");
        }
        assert!(
            extract_parameters(&object(json!({"entitys": {"input": "x"}})))
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_nested_input_unwrapped_once() {
        let params = extract_parameters(&object(json!({
            "entities": {"input": {"expression": "9 / 3", "input": {"deeper": true}}}
        })))
        .unwrap();
        assert_eq!(params.get("expression"), Some(&json!("9 / 3")));
        assert_eq!(params.get("input"), Some(&json!({"deeper": true})));
    }

    #[test]
    fn test_scalar_input_kept_alone() {
        let params = extract_parameters(&object(json!({
            "entities": {"input": "5 + 3", "noise": 1}
        })))
        .unwrap();
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("input"), Some(&json!("5 + 3")));
    }

    #[test]
    fn test_bag_without_input_passes_through() {
        let params = extract_parameters(&object(json!({
            "entities": {}, "entieties": {"angle": 30}
        })))
        .unwrap();
        assert_eq!(params.get("angle"), Some(&json!(30)));
    }

    #[test]
    fn test_non_object_entities_rejected() {
        assert!(extract_parameters(&object(json!({"entities": "25 + 17"}))).is_err());
        assert!(extract_parameters(&object(json!({"entities": ["25", "17"]}))).is_err());
        assert!(
            decode_tool_selection(r#"{"tool_name": "adder", "entities": "25 + 17"}"#).is_err()
        );

        let params = extract_parameters(&object(json!({
            "entities": "", "entitites": {"input": "1 + 1"}
        })))
        .unwrap();
        assert_eq!(params.get("input"), Some(&json!("1 + 1")));
        assert!(extract_parameters(&object(json!({"entities": null}))).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_string_entities_run_no_tool() {
        let selection = r#"{"tool_name": "adder", "entities": "25 + 17", "reasoning": "math"}"#;
        let provider = Arc::new(ScriptedProvider::new([
            Ok(selection),
            Ok(selection),
            Ok("Let me think about 25 + 17."),
        ]));
        let agent = agent(provider.clone());

        assert_eq!(agent.select_tool("What is 25 + 17?", "calculate").await, None);

        let reply = agent.execute("What is 25 + 17?", Some(&Intent::new("calculate", 0.9))).await;
        assert_eq!(provider.call_count(), 3);
        assert!(!provider.prompt(2).unwrap().contains("Tool Result:"));
        assert_eq!(reply, "Let me think about 25 + 17.");
    }

    #[test]
    fn test_builder_rejects_empty_name() {
        let provider = Arc::new(ScriptedProvider::new([]));
        assert!(Agent::builder(" ", provider).build().is_err());
    }

    #[tokio::test]
    async fn test_tool_path() {
        let provider = Arc::new(ScriptedProvider::new([
            Ok(r#"{"tool_name": "adder", "entities": {"input": "25 + 17"}, "reasoning": "math"}"#),
            Ok("  The answer is 42.  "),
        ]));
        let agent = agent(provider.clone());
        let intent = Intent::new("calculate", 0.9);

        let reply = agent.execute("What is 25 + 17?", Some(&intent)).await;
        assert_eq!(reply, "The answer is 42.");
        assert_eq!(provider.call_count(), 2);

        let selection_prompt = provider.prompt(0).unwrap();
        assert!(selection_prompt.contains("  - adder: Adds two numbers"));
        assert_eq!(provider.options(0).unwrap().temperature, 0.0);

        let response_prompt = provider.prompt(1).unwrap();
        assert!(response_prompt.contains("Tool Result:\n25 + 17 = 42"));
        assert!((provider.options(1).unwrap().temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_missing_tool_name_selects_nothing() {
        let provider = Arc::new(ScriptedProvider::new([Ok(
            r#"{"entities": {"input": "25 + 17"}}"#,
        )]));
        assert_eq!(agent(provider).select_tool("hi", "calculate").await, None);
    }

    #[tokio::test]
    async fn test_missing_tool_name_falls_back_to_conversation() {
        let provider = Arc::new(ScriptedProvider::new([
            Ok(r#"{"entities": {"input": "25 + 17"}}"#),
            Ok("Happy to help with math!"),
        ]));
        let agent = agent(provider.clone());

        let reply = agent.execute("hi", Some(&Intent::new("calculate", 0.9))).await;
        assert_eq!(reply, "Happy to help with math!");
        assert!(provider.prompt(1).unwrap().starts_with("You are a helpful AI assistant.\n"));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_silent_no_op() {
        let provider = Arc::new(ScriptedProvider::new([Ok(
            r#"{"tool_name": "weather", "entities": {"input": "London"}}"#,
        )]));
        assert_eq!(agent(provider).select_tool("weather?", "calculate").await, None);
    }

    #[tokio::test]
    async fn test_tool_error_is_fed_to_synthesis() {
        let provider = Arc::new(ScriptedProvider::new([
            Ok(r#"{"tool_name": "failing", "entities": {}}"#),
            Ok("Sorry, that failed."),
        ]));
        let agent = agent(provider.clone());

        let reply = agent.execute("break it", None).await;
        assert_eq!(reply, "Sorry, that failed.");
        assert!(provider.prompt(1).unwrap().contains("Tool Result:\nError: boom"));
    }

    #[tokio::test]
    async fn test_synthesis_failure_returns_raw_tool_result() {
        let provider = Arc::new(ScriptedProvider::new([
            Ok(r#"{"tool_name": "adder", "entieties": {"input": "25 + 17"}}"#),
            Err("model crashed"),
        ]));
        let reply = agent(provider).execute("What is 25 + 17?", None).await;
        assert_eq!(reply, "25 + 17 = 42");
    }

    #[tokio::test]
    async fn test_total_failure_returns_apology() {
        let provider = Arc::new(ScriptedProvider::new([Err("down"), Err("down")]));
        let reply = agent(provider).execute("What is 25 + 17?", None).await;
        assert_eq!(reply, APOLOGY);
    }

    #[tokio::test]
    async fn test_agent_without_tools_skips_selection() {
        let provider = Arc::new(ScriptedProvider::new([Ok("Hello! How can I help?")]));
        let mut agent = Agent::new("Greeting Agent", provider.clone());
        assert!(agent.tools().is_empty());

        let reply = agent
            .execute("Hello there", Some(&Intent::new("greeting", 0.95)))
            .await;
        assert_eq!(reply, "Hello! How can I help?");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.prompt(0).unwrap().contains("friendly AI assistant"));

        agent.register_tool(adder());
        assert_eq!(agent.tools().len(), 1);
    }
}
