//! Compliance Agent
//!
//! - `react`: tool-calling loop over an [`LlmProvider`](crate::ai::LlmProvider)
//! - `runner`: check stream with simulated progress and guaranteed result
//! - `parse`: final answer decoding with the inconclusive fallback
//! - `finder`: product name normalisation for the search endpoint
//! - `prompts`: instructions and templates

pub mod finder;
pub mod parse;
pub mod prompts;
pub mod react;
pub mod runner;

pub use finder::ToolFinder;
pub use parse::parse_compliance_result;
pub use react::{AgentEvent, ReactAgent};
pub use runner::{ComplianceAgent, ProgressSchedule};
