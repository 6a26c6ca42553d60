//! Tool-calling agent loop.
//!
//! Alternates model calls and tool calls until the model answers without
//! requesting tools. Progress is observable only through [`AgentEvent`]s;
//! the loop never returns an error to its consumer.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, debug, warn};

use crate::ai::{ChatMessage, ChatRequest, SharedProvider};
use crate::constants::agent::{DEFAULT_MAX_TURNS, EVENT_CHANNEL_CAPACITY};
use crate::tools::ToolSet;

/// Observable step of the loop
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// A model call finished. `content` is empty on tool-call turns.
    ModelEnd { content: String },
    /// A tool invocation is about to run
    ToolStart { name: String },
    /// A tool invocation finished
    ToolEnd { name: String },
    /// The loop stopped without a final answer
    Failed { reason: String },
}

#[derive(Clone)]
pub struct ReactAgent {
    provider: SharedProvider,
    tools: ToolSet,
    max_turns: usize,
    temperature: Option<f32>,
    json_mode: bool,
}

impl ReactAgent {
    pub fn new(provider: SharedProvider, tools: ToolSet) -> Self {
        Self {
            provider,
            tools,
            max_turns: DEFAULT_MAX_TURNS,
            temperature: None,
            json_mode: false,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    /// Run the loop on a spawned task and stream its events.
    /// The loop stops early once the stream is dropped.
    pub fn stream_events(&self, messages: Vec<ChatMessage>) -> ReceiverStream<AgentEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let agent = self.clone();
        tokio::spawn(async move { agent.run(messages, tx).await }.in_current_span());
        ReceiverStream::new(rx)
    }

    /// Drive the loop, sending each event to `tx`
    pub async fn run(&self, mut messages: Vec<ChatMessage>, tx: mpsc::Sender<AgentEvent>) {
        let definitions = self.tools.definitions();

        for turn in 1..=self.max_turns {
            let mut request = ChatRequest::new(messages.clone())
                .with_tools(definitions.clone())
                .with_json_mode(self.json_mode);
            if let Some(temperature) = self.temperature {
                request = request.with_temperature(temperature);
            }

            let response = match self.provider.chat(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(
                        turn,
                        provider = self.provider.name(),
                        category = %e.category(),
                        error = %e,
                        "Model call failed"
                    );
                    let _ = tx.send(AgentEvent::Failed { reason: e.to_string() }).await;
                    return;
                }
            };

            debug!(
                turn,
                tool_calls = response.message.tool_calls.len(),
                tokens = response.usage.total(),
                "Model turn finished"
            );

            let content = response.message.text().to_string();
            if tx.send(AgentEvent::ModelEnd { content }).await.is_err() {
                return;
            }

            if !response.has_tool_calls() {
                return;
            }

            let calls = response.message.tool_calls.clone();
            messages.push(response.message);

            for call in calls {
                let name = call.function.name;
                if tx.send(AgentEvent::ToolStart { name: name.clone() }).await.is_err() {
                    return;
                }

                debug!(tool = %name, "Invoking tool");
                let output = self.tools.invoke(&name, &call.function.arguments).await;
                messages.push(ChatMessage::tool(call.id, output));

                if tx.send(AgentEvent::ToolEnd { name }).await.is_err() {
                    return;
                }
            }
        }

        warn!(max_turns = self.max_turns, "Agent reached max turns without a final answer");
        let _ = tx
            .send(AgentEvent::Failed {
                reason: format!("max turns ({}) reached", self.max_turns),
            })
            .await;
    }
}
