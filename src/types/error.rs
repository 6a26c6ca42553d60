//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Categories
//!
//! Upstream HTTP failures (LLM provider, search API, email API) are classified
//! into an [`ErrorCategory`] so callers can log something more useful than a
//! raw status code. Nothing in the check pipeline retries on them: tools turn
//! errors into strings, the runner turns them into the fallback result.

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Classification of an upstream failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited by the upstream service
    RateLimit,
    /// Context/token limit exceeded
    TokenLimit,
    /// Authentication failed (bad key, wrong deployment permissions)
    Auth,
    /// Network/connectivity issues
    Network,
    /// Upstream unavailable or deployment not found
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Response body could not be parsed
    ParseError,
    /// Temporary server issues
    Transient,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::TokenLimit => write!(f, "TOKEN_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Classify an HTTP status code and response body
    pub fn from_http(status: u16, body: &str) -> Self {
        match status {
            429 => Self::RateLimit,
            401 | 403 => Self::Auth,
            400 if body.contains("context_length_exceeded") => Self::TokenLimit,
            400 | 422 => Self::BadRequest,
            404 => Self::Unavailable,
            500 | 502 | 503 | 504 => Self::Transient,
            _ => Self::Unknown,
        }
    }

    /// Classify a transport-level reqwest error
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Network
        } else if err.is_decode() {
            Self::ParseError
        } else if let Some(status) = err.status() {
            Self::from_http(status.as_u16(), "")
        } else {
            Self::Unknown
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// LLM error with category and provider context
#[derive(Debug, Clone)]
pub struct LlmError {
    /// Error category
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    /// Create error with provider context
    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    /// Build from a non-success HTTP response
    pub fn from_http(status: u16, body: &str, provider: &str) -> Self {
        Self::with_provider(
            ErrorCategory::from_http(status, body),
            format!("HTTP {}: {}", status, body),
            provider,
        )
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum CheckerError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Upstream Errors
    // -------------------------------------------------------------------------
    #[error("LLM error: {0}")]
    Llm(LlmError),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Report generation failed: {0}")]
    Report(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl From<LlmError> for CheckerError {
    fn from(err: LlmError) -> Self {
        CheckerError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, CheckerError>;

impl CheckerError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Category for logging, when the error came from an upstream call
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Llm(e) => e.category,
            Self::Http(e) => ErrorCategory::from_transport(e),
            Self::Json(_) => ErrorCategory::ParseError,
            Self::Timeout { .. } => ErrorCategory::Network,
            Self::Config(_) | Self::Validation(_) => ErrorCategory::BadRequest,
            _ => ErrorCategory::Unknown,
        }
    }
}
