//! HTTP API
//!
//! axum router serving the check stream, report download, lead capture and
//! tool search, plus the optional static frontend.

mod error;
pub mod handlers;

pub use error::ApiError;

use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::agent::{ComplianceAgent, ToolFinder};
use crate::ai::create_provider;
use crate::config::{Config, ServerConfig};
use crate::constants::network::DEV_FRONTEND_ORIGIN;
use crate::email::EmailNotifier;
use crate::store::ResultStore;
use crate::tools::{create_search_provider, standard_tools};
use crate::types::{CheckerError, Result};

#[derive(Clone)]
pub struct AppState {
    pub agent: ComplianceAgent,
    /// `None` disables `/api/search-tool`
    pub finder: Option<Arc<ToolFinder>>,
    pub store: Arc<ResultStore>,
    pub notifier: Arc<EmailNotifier>,
}

impl AppState {
    /// Wire providers and tools from configuration.
    ///
    /// Fails when the LLM or search backend is misconfigured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(&config.llm)?;
        let search = create_search_provider(&config.search)?;
        let tools = standard_tools(Arc::clone(&search), config)?;

        info!(
            provider = provider.name(),
            model = provider.model(),
            search = search.name(),
            "Application state ready"
        );

        let finder = config
            .api
            .enable_tool_search
            .then(|| Arc::new(ToolFinder::new(search, Some(Arc::clone(&provider)))));

        Ok(Self {
            agent: ComplianceAgent::new(provider, tools, &config.llm),
            finder,
            store: Arc::new(ResultStore::from_config(&config.store)),
            notifier: Arc::new(EmailNotifier::from_config(&config.email)),
        })
    }
}

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let mut api = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/check", post(handlers::check))
        .route("/api/report", post(handlers::report))
        .route("/api/lead", post(handlers::lead));

    if state.finder.is_some() {
        api = api.route("/api/search-tool", get(handlers::search_tool));
    }

    if server.serve_frontend {
        if server.frontend_dir.is_dir() {
            api = api.fallback_service(ServeDir::new(&server.frontend_dir));
        } else {
            warn!(dir = %server.frontend_dir.display(), "Frontend directory not found, not serving it");
        }
    }

    api.layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Configured frontend plus the dev server; credentials rule out wildcards
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = [server.frontend_url.as_str(), DEV_FRONTEND_ORIGIN]
        .into_iter()
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin.trim_end_matches('/')) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "ToolChecker API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .map_err(CheckerError::from)
}
