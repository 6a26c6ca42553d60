//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{agent, email, fetch, network, search, store};
use crate::types::{CheckerError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Web search settings
    pub search: SearchConfig,

    /// Page fetch settings
    pub fetch: FetchConfig,

    /// Lead notification email settings
    pub email: EmailConfig,

    /// Result store settings
    pub store: StoreConfig,

    /// API feature toggles
    pub api: ApiConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `CheckerError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(CheckerError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(CheckerError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_turns == 0 {
            return Err(CheckerError::Config(
                "LLM max_turns must be greater than 0".to_string(),
            ));
        }

        if self.fetch.timeout_secs == 0 || self.search.timeout_secs == 0 {
            return Err(CheckerError::Config(
                "fetch and search timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.fetch.max_chars == 0 {
            return Err(CheckerError::Config(
                "fetch max_chars must be greater than 0".to_string(),
            ));
        }

        if self.store.max_entries == 0 {
            return Err(CheckerError::Config(
                "store max_entries must be greater than 0".to_string(),
            ));
        }

        if !matches!(self.llm.provider.as_str(), "azure-openai" | "openai") {
            return Err(CheckerError::Config(format!(
                "Unknown LLM provider: {}. Supported: azure-openai, openai",
                self.llm.provider
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,

    pub port: u16,

    /// Origin of the deployed frontend, allowed by CORS
    pub frontend_url: String,

    /// Serve the built frontend from `frontend_dir` under `/`
    pub serve_frontend: bool,

    pub frontend_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: network::DEFAULT_HOST.to_string(),
            port: network::DEFAULT_PORT,
            frontend_url: network::DEV_FRONTEND_ORIGIN.to_string(),
            serve_frontend: false,
            frontend_dir: PathBuf::from("frontend/dist"),
        }
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: "azure-openai" or "openai"
    pub provider: String,

    /// Azure resource endpoint, or API base URL for OpenAI-compatible servers
    pub endpoint: String,

    /// API key. Never serialized to output
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Azure deployment name
    pub deployment: String,

    /// Azure API version
    pub api_version: String,

    /// Model name for OpenAI-compatible servers (ignored by Azure)
    pub model: String,

    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum model calls per check
    pub max_turns: usize,

    /// Ask the model for a JSON object response
    pub json_mode: bool,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_turns", &self.max_turns)
            .field("json_mode", &self.json_mode)
            .finish()
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "azure-openai".to_string(),
            endpoint: String::new(),
            api_key: None,
            deployment: "gpt-4o".to_string(),
            api_version: "2024-12-01-preview".to_string(),
            model: "gpt-4o".to_string(),
            temperature: agent::DEFAULT_TEMPERATURE,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            max_turns: agent::DEFAULT_MAX_TURNS,
            json_mode: true,
        }
    }
}

// =============================================================================
// Search Configuration
// =============================================================================

/// Which search backend the agent uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Bing when a key is configured, DuckDuckGo otherwise
    #[default]
    Auto,
    DuckDuckGo,
    Bing,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub provider: SearchBackend,

    /// Bing Web Search subscription key. Never serialized to output
    #[serde(skip_serializing)]
    pub bing_api_key: Option<String>,

    /// Override for the DuckDuckGo HTML endpoint
    pub duckduckgo_url: String,

    /// Override for the Bing API endpoint
    pub bing_url: String,

    pub max_results: usize,

    pub timeout_secs: u64,
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("provider", &self.provider)
            .field("bing_api_key", &self.bing_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("duckduckgo_url", &self.duckduckgo_url)
            .field("bing_url", &self.bing_url)
            .field("max_results", &self.max_results)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchBackend::Auto,
            bing_api_key: None,
            duckduckgo_url: search::DUCKDUCKGO_HTML_URL.to_string(),
            bing_url: search::BING_API_URL.to_string(),
            max_results: search::AGENT_MAX_RESULTS,
            timeout_secs: search::TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Backend after resolving `auto` against the configured keys
    pub fn effective_backend(&self) -> SearchBackend {
        match self.provider {
            SearchBackend::Auto if self.bing_api_key.as_deref().is_some_and(|k| !k.is_empty()) => {
                SearchBackend::Bing
            }
            SearchBackend::Auto => SearchBackend::DuckDuckGo,
            other => other,
        }
    }
}

// =============================================================================
// Fetch Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,

    /// Page text budget handed back to the model
    pub max_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: fetch::TIMEOUT_SECS,
            max_chars: fetch::MAX_CHARS,
        }
    }
}

// =============================================================================
// Email Configuration
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// ACS connection string (`endpoint=...;accesskey=...`). Never serialized
    #[serde(skip_serializing)]
    pub connection_string: Option<String>,

    /// Verified sender address
    pub sender: String,

    /// Where lead notifications go
    pub recipient: String,

    pub poll_attempts: usize,

    pub poll_interval_ms: u64,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("poll_attempts", &self.poll_attempts)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            sender: String::new(),
            recipient: email::DEFAULT_RECIPIENT.to_string(),
            poll_attempts: email::DEFAULT_POLL_ATTEMPTS,
            poll_interval_ms: email::DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub max_entries: usize,

    pub ttl_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_entries: store::DEFAULT_MAX_ENTRIES,
            ttl_secs: store::DEFAULT_TTL_SECS,
        }
    }
}

// =============================================================================
// API Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Expose `/api/search-tool`
    pub enable_tool_search: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_tool_search: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
