//! Route handlers.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::Stream;
use serde::Deserialize;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, warn};

use super::AppState;
use super::error::ApiError;
use crate::constants::agent::EVENT_CHANNEL_CAPACITY;
use crate::constants::report::MIME_TYPE;
use crate::constants::search::{MAX_QUERY_CHARS, MIN_QUERY_CHARS};
use crate::report::{generate_report, report_filename};
use crate::store::ResultStore;
use crate::types::{CheckEvent, CheckRequest, LeadRequest, ToolCandidate};

pub const REPORT_NOT_FOUND: &str =
    "Geen check resultaat gevonden voor deze tool. Voer eerst een check uit.";

pub const NO_RESULT_ERROR: &str = "Geen resultaat ontvangen";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn search_tool(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ToolCandidate>>, ApiError> {
    let len = params.q.chars().count();
    if !(MIN_QUERY_CHARS..=MAX_QUERY_CHARS).contains(&len) {
        return Err(ApiError::Unprocessable(format!(
            "q must be between {MIN_QUERY_CHARS} and {MAX_QUERY_CHARS} characters"
        )));
    }

    let candidates = match &state.finder {
        Some(finder) => finder.find(&params.q).await,
        None => vec![ToolCandidate::from_query(&params.q)],
    };
    Ok(Json(candidates))
}

/// Streams the check as SSE.
///
/// The run is relayed by a detached task, so a client that disconnects does
/// not stop the check and the result is still stored.
pub async fn check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    request.validate()?;
    info!(tool = %request.tool_name, "Check requested");

    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let events = state.agent.check(&request.tool_name);
    let store = Arc::clone(&state.store);
    tokio::spawn(relay_check(events, store, request.tool_name, tx));

    Ok(Sse::new(ReceiverStream::new(rx).map(Ok)).keep_alive(KeepAlive::default()))
}

async fn relay_check(
    events: impl Stream<Item = CheckEvent>,
    store: Arc<ResultStore>,
    tool_name: String,
    tx: mpsc::Sender<Event>,
) {
    tokio::pin!(events);
    let mut connected = true;
    let mut received_result = false;

    while let Some(event) = events.next().await {
        let sse = match event {
            CheckEvent::Progress(update) => Event::default().event("progress").json_data(&update),
            CheckEvent::Result(result) => {
                received_result = true;
                let sse = Event::default().event("result").json_data(&*result);
                store.insert(&tool_name, *result);
                sse
            }
        };

        let sse = match sse {
            Ok(sse) => sse,
            Err(e) => {
                warn!(error = %e, "Failed to encode SSE event");
                continue;
            }
        };

        if connected && tx.send(sse).await.is_err() {
            debug!(tool = %tool_name, "Client disconnected, check continues");
            connected = false;
        }
    }

    if !received_result && connected {
        let error = Event::default()
            .event("error")
            .data(json!({ "error": NO_RESULT_ERROR }).to_string());
        let _ = tx.send(error).await;
    }
}

pub async fn report(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Result<Response, ApiError> {
    let result = state
        .store
        .get(&request.tool_name)
        .ok_or_else(|| ApiError::NotFound(REPORT_NOT_FOUND.to_string()))?;

    let filename = report_filename(&result.tool_name);
    let bytes = tokio::task::spawn_blocking(move || generate_report(&result))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(%filename, size = bytes.len(), "Report generated");

    Ok((
        [
            (header::CONTENT_TYPE, MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn lead(
    State(state): State<AppState>,
    Json(lead): Json<LeadRequest>,
) -> Result<Json<Value>, ApiError> {
    lead.validate()?;
    let email_sent = state.notifier.send_lead_email(&lead).await;
    info!(tool = %lead.tool_name, email_sent, "Lead received");
    Ok(Json(json!({ "status": "ok", "email_sent": email_sent })))
}
