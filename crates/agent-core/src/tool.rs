//! Tool System
//!
//! A tool is a named, described callable. Agents own a [`ToolRegistry`] and
//! let the model pick one tool per request. Failures never cross the tool
//! boundary: [`Tool::call`] always yields a string.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Arguments handed to a tool, keyed by parameter name
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// Signature of the function a tool wraps
pub type ToolFn = dyn Fn(&Parameters) -> anyhow::Result<String> + Send + Sync;

/// Declared parameter, shown to the model during tool selection
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// Human-readable description, may embed quoted samples like `'5 + 3'`
    pub description: String,
}

/// A callable capability an agent can delegate to
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    parameters: Vec<ParameterSchema>,
    function: Arc<ToolFn>,
}

impl Tool {
    /// Wrap `function` as a tool
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Parameters) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            function: Arc::new(function),
        }
    }

    /// Declare a parameter the function reads
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.push(ParameterSchema {
            name: name.into(),
            description: description.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParameterSchema] {
        &self.parameters
    }

    /// Description of a declared parameter
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.description.as_str())
    }

    /// Run the wrapped function.
    ///
    /// An `Err` from the function comes back as `"Error: <message>"`.
    pub fn call(&self, parameters: &Parameters) -> String {
        match (self.function)(parameters) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!(tool = %self.name, error = %e, "Tool execution failed");
                format!("Error: {e}")
            }
        }
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Registry for the tools one agent owns
#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Tools in name order
    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.values()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo() -> Tool {
        Tool::new("echo", "Repeats its input", |params: &Parameters| {
            Ok(params
                .get("input")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string())
        })
        .with_parameter("input", "Text to repeat (e.g., 'hello')")
    }

    fn params(value: serde_json::Value) -> Parameters {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_call_success() {
        let tool = echo();
        assert_eq!(tool.call(&params(json!({"input": "hi"}))), "hi");
    }

    #[test]
    fn test_call_failure_becomes_text() {
        let tool = Tool::new("broken", "Always fails", |_: &Parameters| {
            anyhow::bail!("disk on fire")
        });
        let out = tool.call(&Parameters::new());
        assert!(out.starts_with("Error:"));
        assert_eq!(out, "Error: disk on fire");
    }

    #[test]
    fn test_parameter_lookup() {
        let tool = echo();
        assert_eq!(tool.parameters().len(), 1);
        assert!(tool.parameter("input").unwrap().contains("'hello'"));
        assert!(tool.parameter("missing").is_none());
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(echo());
        registry.register(Tool::new("clock", "Says noon", |_: &Parameters| Ok("12:00".into())));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["clock", "echo"]);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(echo());
        registry.register(Tool::new("echo", "Shouts", |_: &Parameters| Ok("HI".into())));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().description(), "Shouts");
    }
}
