//! Agent Tools
//!
//! Tools the compliance agent can call. A tool always answers with text:
//! failures are reported to the model, never raised to the loop.

pub mod fetch;
pub mod search;

pub use fetch::{FetchWebpageTool, html_to_text, truncate_text};
pub use search::{
    BingSearch, DuckDuckGoSearch, SearchHit, SearchProvider, SharedSearch, WebSearchTool,
    create_search_provider, format_digest,
};

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::ai::ToolDefinition;
use crate::config::Config;
use crate::types::Result;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Function name advertised to the model
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON Schema of the arguments object
    fn parameters(&self) -> Value;

    async fn call(&self, args: Value) -> String;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(self.name(), self.description(), self.parameters())
    }
}

/// Ordered set of tools offered to the agent
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Call a tool by name with the raw JSON argument string from the model
    pub async fn invoke(&self, name: &str, raw_args: &str) -> String {
        let Some(tool) = self.get(name) else {
            return format!("Onbekende tool: {}", name);
        };

        let args = if raw_args.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            match serde_json::from_str::<Value>(raw_args) {
                Ok(args) => args,
                Err(e) => return format!("Ongeldige argumenten voor {}: {}", name, e),
            }
        };

        tool.call(args).await
    }
}

/// `web_search` + `fetch_webpage` over the configured backends
pub fn standard_tools(search: SharedSearch, config: &Config) -> Result<ToolSet> {
    Ok(ToolSet::new()
        .with(Arc::new(WebSearchTool::new(search, config.search.max_results)))
        .with(Arc::new(FetchWebpageTool::new(&config.fetch)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object", "properties": {"text": {"type": "string"}}})
        }

        async fn call(&self, args: Value) -> String {
            args["text"].as_str().unwrap_or("<none>").to_string()
        }
    }

    #[tokio::test]
    async fn test_invoke_dispatches_by_name() {
        let tools = ToolSet::new().with(Arc::new(Echo));
        assert_eq!(tools.invoke("echo", r#"{"text":"hi"}"#).await, "hi");
        assert_eq!(tools.invoke("echo", "").await, "<none>");
    }

    #[tokio::test]
    async fn test_invoke_reports_bad_calls() {
        let tools = ToolSet::new().with(Arc::new(Echo));
        assert_eq!(tools.invoke("nope", "{}").await, "Onbekende tool: nope");
        assert!(
            tools
                .invoke("echo", "{not json")
                .await
                .starts_with("Ongeldige argumenten voor echo:")
        );
    }

    #[test]
    fn test_standard_tools_definitions() {
        let search = create_search_provider(&Default::default()).unwrap();
        let tools = standard_tools(search, &Config::default()).unwrap();
        let names: Vec<_> = tools
            .definitions()
            .into_iter()
            .map(|d| d.function.name)
            .collect();
        assert_eq!(names, vec!["web_search", "fetch_webpage"]);
    }
}
