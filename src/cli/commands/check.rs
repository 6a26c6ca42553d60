//! Check Command
//!
//! Runs one compliance check in the terminal.
//!
//! Usage:
//!   toolchecker check <TOOL> [--json]

use std::sync::Arc;
use tokio_stream::StreamExt;

use crate::agent::ComplianceAgent;
use crate::ai::create_provider;
use crate::cli::Output;
use crate::config::Config;
use crate::tools::{create_search_provider, standard_tools};
use crate::types::{
    CheckEvent, CheckRequest, CheckerError, ComplianceResult, ErrorCategory, LlmError, Result,
};

pub async fn run(config: &Config, tool: &str, json: bool, quiet: bool) -> Result<()> {
    CheckRequest {
        tool_name: tool.to_string(),
    }
    .validate()?;

    let provider = create_provider(&config.llm)?;
    let search = create_search_provider(&config.search)?;
    let tools = standard_tools(Arc::clone(&search), config)?;
    let agent = ComplianceAgent::new(provider, tools, &config.llm);

    let output = Output::quiet(quiet);
    let result = collect_result(&agent, tool, &output).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        output.result(&result);
    }
    Ok(())
}

async fn collect_result(
    agent: &ComplianceAgent,
    tool: &str,
    output: &Output,
) -> Result<ComplianceResult> {
    let events = agent.check(tool);
    tokio::pin!(events);

    while let Some(event) = events.next().await {
        match event {
            CheckEvent::Progress(update) => output.progress(&update),
            CheckEvent::Result(result) => return Ok(*result),
        }
    }

    Err(CheckerError::Llm(LlmError::new(
        ErrorCategory::Unknown,
        format!("Check for {tool} ended without a result"),
    )))
}
