// SPDX-License-Identifier: MIT

use crate::adk::tool::{Tool, ToolDescriptor, ToolResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Outcome of routing an invocation by tool name
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Completed(ToolResult),
    NotFound {
        tool: String,
        available: Vec<String>,
    },
}

impl Dispatch {
    /// Collapse into the uniform result shape; an unknown tool is a client error
    pub fn into_result(self) -> ToolResult {
        match self {
            Dispatch::Completed(result) => result,
            Dispatch::NotFound { tool, available } => ToolResult::client_error(format!(
                "Tool '{}' not found. Available tools: {}",
                tool,
                available.join(", ")
            )),
        }
    }
}

/// Name-indexed table of tools, built once at startup.
///
/// Registration takes `&mut self`; once the registry is shared behind an
/// `Arc` it can only be read.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    /// Name -> position in `tools`
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any earlier tool with the same name in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        match self.index.get(&name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn with_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        let mut registry = Self::new();
        for tool in tools {
            registry.register(tool);
        }
        registry
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Route an invocation to the tool registered under `name` (exact match)
    pub async fn dispatch(&self, name: &str, parameters: Value) -> Dispatch {
        match self.get(name) {
            Some(tool) => {
                log::info!("Dispatching tool: {}", name);
                Dispatch::Completed(tool.invoke(parameters).await)
            }
            None => {
                log::warn!("Unknown tool requested: {}", name);
                Dispatch::NotFound {
                    tool: name.to_string(),
                    available: self.names(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adk::tool::ToolStatus;
    use async_trait::async_trait;
    use serde_json::json;

    use once_cell::sync::Lazy;

    static MOCK_SCHEMA: Lazy<Value> = Lazy::new(|| {
        json!({
            "type": "object",
            "properties": {}
        })
    });

    /// A mock tool that echoes its parameters back as the message
    struct MockTool {
        name: String,
        description: String,
    }

    impl MockTool {
        fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                description: format!("Mock tool: {}", name),
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            &self.description
        }

        fn schema(&self) -> &Value {
            &MOCK_SCHEMA
        }

        fn output_schema(&self) -> &Value {
            &MOCK_SCHEMA
        }

        async fn invoke(&self, parameters: Value) -> ToolResult {
            ToolResult::success(parameters.to_string(), &self.description)
        }
    }

    fn mock(name: &str) -> Arc<dyn Tool> {
        Arc::new(MockTool::new(name))
    }

    #[test]
    fn test_register_and_get_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(mock("test_tool"));

        let retrieved = registry.get("test_tool");
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().name(), "test_tool");
    }

    #[test]
    fn test_get_nonexistent_tool() {
        let registry = ToolRegistry::new();
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = ToolRegistry::with_tools([mock("blogpost")]);
        assert!(registry.get("Blogpost").is_none());
        assert!(registry.get("blogpost ").is_none());
        assert!(registry.get("blogpost").is_some());
    }

    #[test]
    fn test_register_multiple_tools_keeps_order() {
        let mut registry = ToolRegistry::new();
        registry.register(mock("tool1"));
        registry.register(mock("tool2"));
        registry.register(mock("tool3"));

        assert_eq!(registry.names(), vec!["tool1", "tool2", "tool3"]);
        assert!(registry.get("tool4").is_none());
    }

    #[test]
    fn test_register_overwrites_existing() {
        let mut registry = ToolRegistry::new();
        registry.register(mock("same_name"));
        registry.register(mock("other"));
        registry.register(mock("same_name"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["same_name", "other"]);
    }

    #[test]
    fn test_descriptors() {
        let registry = ToolRegistry::with_tools([mock("tool1")]);
        let descriptors = registry.descriptors();

        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "tool1");
        assert_eq!(descriptors[0].description, "Mock tool: tool1");
        assert_eq!(descriptors[0].parameters["type"], "object");
    }

    #[tokio::test]
    async fn test_dispatch_known_tool() {
        let registry = ToolRegistry::with_tools([mock("echo")]);

        match registry.dispatch("echo", json!({"topic": "rust"})).await {
            Dispatch::Completed(result) => {
                assert!(result.is_success());
                assert_eq!(result.message, r#"{"topic":"rust"}"#);
            }
            other => panic!("Expected Completed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_lists_known_names() {
        let registry = ToolRegistry::with_tools([mock("blogpost"), mock("summary")]);

        for parameters in [json!({}), json!({"topic": "rust"}), json!(null)] {
            let dispatch = registry.dispatch("weather", parameters).await;
            assert_eq!(
                dispatch,
                Dispatch::NotFound {
                    tool: "weather".to_string(),
                    available: vec!["blogpost".to_string(), "summary".to_string()],
                }
            );

            let result = dispatch.into_result();
            assert_eq!(result.message, "");
            assert_eq!(result.status, ToolStatus::ClientError);
            assert_eq!(
                result.description,
                "Tool 'weather' not found. Available tools: blogpost, summary"
            );
        }
    }
}
