//! AI Integration Layer
//!
//! Chat-completions providers and model output extraction.

pub mod extract;
pub mod provider;

pub use extract::{decode_payload, extract_payload};
pub use provider::{
    ChatMessage, ChatRequest, ChatResponse, ErrorCategory, FunctionCall, LlmError, LlmProvider,
    OpenAiProvider, Role, SharedProvider, TokenUsage, ToolCall, ToolDefinition, create_provider,
};
