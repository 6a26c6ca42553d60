//! ToolChecker - AVG/GDPR Compliance Checks for SaaS Tools
//!
//! An LLM agent researches a tool on the public web (privacy policy, DPA,
//! sub-processor lists, security pages) and produces a traffic-light
//! assessment, which can be downloaded as a Word report.
//!
//! ## Modules
//!
//! - [`agent`]: tool-calling loop, check runner, result parsing, tool finder
//! - [`ai`]: chat-completions provider abstraction (Azure OpenAI, OpenAI)
//! - [`tools`]: `web_search` and `fetch_webpage` agent tools
//! - [`api`]: axum HTTP API with SSE check stream
//! - [`report`]: DOCX report rendering
//! - [`email`]: lead notification via Azure Communication Services
//! - [`store`]: in-memory store of finished checks
//! - [`config`]: layered configuration

pub mod agent;
pub mod ai;
pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod email;
pub mod report;
pub mod store;
pub mod tools;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use agent::{ComplianceAgent, ToolFinder};
pub use api::{AppState, router};
pub use config::{Config, ConfigLoader};
pub use email::EmailNotifier;
pub use report::{generate_report, render_report, report_filename};
pub use store::ResultStore;
pub use types::{
    CheckEvent, CheckerError, ComplianceResult, ErrorCategory, ProgressUpdate, Result,
    TrafficLight,
};
