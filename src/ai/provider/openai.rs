//! OpenAI / Azure OpenAI Provider
//!
//! Chat Completions API with tool calling. Azure addresses a deployment and
//! authenticates with an `api-key` header; OpenAI-compatible servers take a
//! model name and a bearer token.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

use super::{
    ChatMessage, ChatRequest, ChatResponse, ErrorCategory, LlmError, LlmProvider, TokenUsage,
    ToolDefinition,
};
use crate::config::LlmConfig;
use crate::types::{CheckerError, Result};

const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Addressing and auth scheme
#[derive(Debug, Clone)]
enum ApiFlavor {
    Azure {
        deployment: String,
        api_version: String,
    },
    OpenAi {
        model: String,
    },
}

/// Chat-completions provider with secure API key handling
pub struct OpenAiProvider {
    /// API key stored securely - never exposed in logs or debug output
    api_key: SecretString,
    endpoint: String,
    flavor: ApiFlavor,
    temperature: f32,
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("flavor", &self.flavor)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiProvider {
    /// Azure OpenAI deployment at `config.endpoint`
    pub fn azure(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CheckerError::Config(
                    "Azure OpenAI API key not found. Set AZURE_OPENAI_API_KEY or llm.api_key"
                        .to_string(),
                )
            })?;

        if config.endpoint.trim().is_empty() {
            return Err(CheckerError::Config(
                "Azure OpenAI endpoint not set. Set AZURE_OPENAI_ENDPOINT or llm.endpoint"
                    .to_string(),
            ));
        }

        Self::build(
            config,
            api_key,
            config.endpoint.clone(),
            ApiFlavor::Azure {
                deployment: config.deployment.clone(),
                api_version: config.api_version.clone(),
            },
        )
    }

    /// OpenAI or any server speaking the same API
    pub fn openai(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                CheckerError::Config(
                    "OpenAI API key not found. Set OPENAI_API_KEY or llm.api_key".to_string(),
                )
            })?;

        let endpoint = if config.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_BASE.to_string()
        } else {
            config.endpoint.clone()
        };

        Self::build(
            config,
            api_key,
            endpoint,
            ApiFlavor::OpenAi {
                model: config.model.clone(),
            },
        )
    }

    fn build(config: &LlmConfig, api_key: String, endpoint: String, flavor: ApiFlavor) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: SecretString::from(api_key),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            flavor,
            temperature: config.temperature,
            client,
        })
    }

    fn url(&self) -> String {
        match &self.flavor {
            ApiFlavor::Azure {
                deployment,
                api_version,
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                self.endpoint, deployment, api_version
            ),
            ApiFlavor::OpenAi { .. } => format!("{}/chat/completions", self.endpoint),
        }
    }

    fn build_request<'a>(&'a self, request: &'a ChatRequest) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            // Azure takes the model from the deployment path
            model: match &self.flavor {
                ApiFlavor::Azure { .. } => None,
                ApiFlavor::OpenAi { model } => Some(model),
            },
            messages: &request.messages,
            tools: (!request.tools.is_empty()).then_some(&request.tools),
            temperature: request.temperature.unwrap_or(self.temperature),
            response_format: request.json_mode.then(|| ResponseFormat {
                format_type: "json_object",
            }),
        }
    }

    fn llm_error(&self, category: ErrorCategory, message: impl Into<String>) -> LlmError {
        LlmError::with_provider(category, message, self.name())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start_time = Instant::now();
        let body = self.build_request(&request);

        debug!(
            provider = self.name(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending chat completion request"
        );

        let builder = self.client.post(self.url()).json(&body);
        let builder = match self.flavor {
            ApiFlavor::Azure { .. } => builder.header("api-key", self.api_key.expose_secret()),
            ApiFlavor::OpenAi { .. } => builder.bearer_auth(self.api_key.expose_secret()),
        };

        let response = builder.send().await.map_err(|e| {
            self.llm_error(
                ErrorCategory::from_transport(&e),
                format!("Request failed: {}", e),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_http(status.as_u16(), &body, self.name()).into());
        }

        let response_body: ChatCompletionResponse = response.json().await.map_err(|e| {
            self.llm_error(
                ErrorCategory::ParseError,
                format!("Failed to parse response: {}", e),
            )
        })?;

        let usage = response_body
            .usage
            .map(|u| TokenUsage::from_openai(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        let message = response_body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| self.llm_error(ErrorCategory::ParseError, "No choices in response"))?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            tool_calls = message.tool_calls.len(),
            tokens = usage.total(),
            "Chat completion received"
        );

        Ok(ChatResponse { message, usage })
    }

    fn name(&self) -> &str {
        match self.flavor {
            ApiFlavor::Azure { .. } => "azure-openai",
            ApiFlavor::OpenAi { .. } => "openai",
        }
    }

    fn model(&self) -> &str {
        match &self.flavor {
            ApiFlavor::Azure { deployment, .. } => deployment,
            ApiFlavor::OpenAi { model } => model,
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a String>,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a Vec<ToolDefinition>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<UsageInfo>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct UsageInfo {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn azure_config(endpoint: &str) -> LlmConfig {
        LlmConfig {
            endpoint: endpoint.to_string(),
            api_key: Some("test-key".to_string()),
            deployment: "gpt-4o".to_string(),
            api_version: "2024-12-01-preview".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_azure_chat_returns_tool_calls() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/openai/deployments/gpt-4o/chat/completions"))
            .and(query_param("api-version", "2024-12-01-preview"))
            .and(header("api-key", "test-key"))
            .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "web_search", "arguments": "{\"query\":\"Slack\"}"}
                        }]
                    }
                }],
                "usage": {"prompt_tokens": 120, "completion_tokens": 30}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenAiProvider::azure(&azure_config(&server.uri())).unwrap();
        let request = ChatRequest::new(vec![ChatMessage::user("check Slack")]).with_json_mode(true);
        let response = provider.chat(request).await.unwrap();

        assert!(response.has_tool_calls());
        assert_eq!(response.message.tool_calls[0].function.name, "web_search");
        assert_eq!(response.usage.total(), 150);
        assert_eq!(provider.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn test_openai_uses_bearer_and_model() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "{}"}}]
            })))
            .mount(&server)
            .await;

        let config = LlmConfig {
            provider: "openai".to_string(),
            endpoint: server.uri(),
            api_key: Some("sk-test".to_string()),
            model: "gpt-4o-mini".to_string(),
            ..Default::default()
        };
        let provider = OpenAiProvider::openai(&config).unwrap();
        let response = provider
            .chat(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap();

        assert_eq!(response.message.text(), "{}");
        assert_eq!(provider.name(), "openai");
    }

    #[tokio::test]
    async fn test_http_error_is_classified() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::azure(&azure_config(&server.uri())).unwrap();
        let err = provider
            .chat(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::RateLimit);
    }

    #[test]
    fn test_azure_requires_endpoint() {
        let config = azure_config("");
        assert!(OpenAiProvider::azure(&config).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let provider = OpenAiProvider::azure(&azure_config("https://x.openai.azure.com/")).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains("test-key"));
        assert_eq!(
            provider.url(),
            "https://x.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-12-01-preview"
        );
    }
}
