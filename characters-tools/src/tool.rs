//! Tool trait and tool-related types.
//!
//! A tool is a named, typed, documented operation that external callers (an
//! agent runtime, an RPC bridge) can invoke by name with a JSON params
//! payload. The registry owns the name -> tool mapping and dispatches calls.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Core tool trait - a callable operation with a typed contract.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name, e.g. `createCharacter`.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for the params payload.
    fn input_schema(&self) -> &Value;

    /// Behavioral hints for callers.
    fn annotations(&self) -> ToolAnnotations {
        ToolAnnotations::default()
    }

    /// Execute the tool with the given params.
    async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError>;
}

/// Annotations providing hints about tool behavior.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ToolAnnotations {
    /// Tool only reads data, no side effects.
    pub read_only: bool,
    /// Tool may destroy data irreversibly.
    pub destructive: bool,
    /// Safe to retry with the same params.
    pub idempotent: bool,
}

impl ToolAnnotations {
    /// Annotations for a read-only tool.
    pub const fn read_only() -> Self {
        Self {
            read_only: true,
            destructive: false,
            idempotent: true,
        }
    }

    /// Annotations for a tool that writes but can be retried safely.
    pub const fn idempotent_write() -> Self {
        Self {
            read_only: false,
            destructive: false,
            idempotent: true,
        }
    }

    /// Annotations for a tool that writes and is not safe to blindly retry.
    pub const fn write() -> Self {
        Self {
            read_only: false,
            destructive: false,
            idempotent: false,
        }
    }

    /// Annotations for a destructive tool.
    pub const fn destructive() -> Self {
        Self {
            read_only: false,
            destructive: true,
            idempotent: true,
        }
    }
}

/// Output from a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Human-readable rendering of the result.
    pub content: String,
    /// Structured result payload. `Null` for operations that answer a miss
    /// with an empty result instead of an error.
    pub structured: Value,
}

impl ToolOutput {
    /// A text-only output.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            structured: Value::Null,
        }
    }

    /// An output carrying a structured payload.
    pub fn structured(content: impl Into<String>, structured: Value) -> Self {
        Self {
            content: content.into(),
            structured,
        }
    }

    /// The silent-absent result: the operation ran, found nothing, and that
    /// is not an error for this operation.
    pub fn missing(content: impl Into<String>) -> Self {
        Self::text(content)
    }

    /// Whether this output carries no structured payload.
    pub fn is_missing(&self) -> bool {
        self.structured.is_null()
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// Tool definition for publishing the contract to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub annotations: ToolAnnotations,
}

/// Registry of callable operations, keyed by name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tool_count", &self.tools.len())
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> &mut Self {
        self.tools.insert(tool.name().to_string(), Arc::new(tool));
        self
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check if a tool exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// All registered tool names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|name| name.as_str())
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions for every registered tool, sorted by name so the listing
    /// is stable.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema().clone(),
                annotations: tool.annotations(),
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Look up a tool by name and execute it.
    pub async fn dispatch(&self, name: &str, params: Value) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        debug!(tool = name, "dispatching");
        tool.execute(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the params back"
        }

        fn input_schema(&self) -> &Value {
            static SCHEMA: Lazy<Value> = Lazy::new(|| {
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "input": { "type": "string" }
                    }
                })
            });
            &SCHEMA
        }

        fn annotations(&self) -> ToolAnnotations {
            ToolAnnotations::read_only()
        }

        async fn execute(&self, params: Value) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::structured(params.to_string(), params))
        }
    }

    #[test]
    fn test_registry_registration() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert!(registry.contains("echo"));
        assert_eq!(registry.len(), 1);

        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name, "echo");
        assert!(definitions[0].annotations.read_only);
    }

    #[tokio::test]
    async fn test_dispatch_known_and_unknown() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let output = registry
            .dispatch("echo", serde_json::json!({ "input": "hi" }))
            .await
            .unwrap();
        assert_eq!(output.structured["input"], "hi");

        let err = registry
            .dispatch("nope", Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }

    #[test]
    fn test_tool_output_missing() {
        let output = ToolOutput::missing("No character found");
        assert!(output.is_missing());
        assert_eq!(output.to_string(), "No character found");

        let output = ToolOutput::structured("ok", serde_json::json!({ "a": 1 }));
        assert!(!output.is_missing());
    }
}
