//! Compliance check runner.
//!
//! Wraps the agent loop and turns its events into the client-facing stream:
//! progress updates, then exactly one [`ComplianceResult`].

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use super::parse::parse_compliance_result;
use super::prompts::{SYSTEM_PROMPT, user_message};
use super::react::{AgentEvent, ReactAgent};
use crate::ai::{ChatMessage, SharedProvider};
use crate::config::LlmConfig;
use crate::constants::agent::{
    DONE_PROGRESS, EVENT_CHANNEL_CAPACITY, PARSING_PROGRESS, START_PROGRESS,
    TOOL_PROGRESS_SCHEDULE,
};
use crate::tools::ToolSet;
use crate::types::{CheckEvent, ProgressUpdate};

/// Simulated progress, advanced once per tool invocation
#[derive(Debug, Default)]
pub struct ProgressSchedule {
    next: usize,
}

impl ProgressSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next scheduled update, or `None` once the schedule is exhausted
    pub fn advance(&mut self) -> Option<ProgressUpdate> {
        let (progress, message) = TOOL_PROGRESS_SCHEDULE.get(self.next)?;
        let update = ProgressUpdate::new(format!("tool_{}", self.next), *message, *progress);
        self.next += 1;
        Some(update)
    }
}

#[derive(Clone)]
pub struct ComplianceAgent {
    agent: ReactAgent,
}

impl ComplianceAgent {
    pub fn new(provider: SharedProvider, tools: ToolSet, config: &LlmConfig) -> Self {
        let agent = ReactAgent::new(provider, tools)
            .with_max_turns(config.max_turns)
            .with_temperature(config.temperature)
            .with_json_mode(config.json_mode);
        Self { agent }
    }

    /// Start a check for `tool_name`.
    ///
    /// The stream always ends with one `CheckEvent::Result`, falling back to
    /// the inconclusive result when the agent produced nothing usable.
    pub fn check(&self, tool_name: &str) -> impl Stream<Item = CheckEvent> + Send + 'static {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let agent = self.agent.clone();
        let tool_name = tool_name.to_string();
        let span = info_span!("check", tool = %tool_name, run_id = %Uuid::new_v4());

        tokio::spawn(async move { run_check(agent, tool_name, tx).await }.instrument(span));

        ReceiverStream::new(rx)
    }
}

async fn run_check(agent: ReactAgent, tool_name: String, tx: mpsc::Sender<CheckEvent>) {
    info!("Compliance check started");

    let send = |update: ProgressUpdate| {
        let tx = tx.clone();
        async move { tx.send(CheckEvent::Progress(update)).await.is_ok() }
    };

    if !send(ProgressUpdate::new(
        "start",
        format!("Compliance check gestart voor {}...", tool_name),
        START_PROGRESS,
    ))
    .await
    {
        return;
    }

    let messages = vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(user_message(&tool_name)),
    ];

    let mut schedule = ProgressSchedule::new();
    let mut final_content = String::new();
    let mut tool_calls = 0usize;

    let mut events = agent.stream_events(messages);
    while let Some(event) = events.next().await {
        match event {
            AgentEvent::ToolStart { .. } => {
                tool_calls += 1;
                if let Some(update) = schedule.advance()
                    && !send(update).await
                {
                    return;
                }
            }
            AgentEvent::ModelEnd { content } => final_content = content,
            AgentEvent::ToolEnd { .. } => {}
            AgentEvent::Failed { reason } => {
                warn!(%reason, "Agent stopped without a final answer");
            }
        }
    }

    if !send(ProgressUpdate::new(
        "parsing",
        "Resultaten verwerken...",
        PARSING_PROGRESS,
    ))
    .await
    {
        return;
    }

    let result = parse_compliance_result(&final_content, &tool_name);

    if !send(ProgressUpdate::new("done", "Check voltooid!", DONE_PROGRESS)).await {
        return;
    }

    info!(
        status = %result.overall_status,
        categories = result.categories.len(),
        tool_calls,
        "Compliance check finished"
    );
    let _ = tx.send(CheckEvent::Result(Box::new(result))).await;
}
