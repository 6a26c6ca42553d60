//! Web Search
//!
//! `SearchProvider` backends and the `web_search` agent tool. The tool never
//! fails: errors and empty result sets come back as text for the model.

use async_trait::async_trait;
use scraper::{Html, Selector};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, warn};

use super::Tool;
use crate::config::{SearchBackend, SearchConfig};
use crate::constants::fetch::USER_AGENT;
use crate::types::{CheckerError, Result};

/// One search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Backend that turns a query into ranked hits
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &str;
}

pub type SharedSearch = Arc<dyn SearchProvider>;

/// Build the configured backend
pub fn create_search_provider(config: &SearchConfig) -> Result<SharedSearch> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.effective_backend() {
        SearchBackend::Bing => {
            let key = config
                .bing_api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    CheckerError::Config(
                        "Bing search selected but BING_SUBSCRIPTION_KEY is not set".to_string(),
                    )
                })?;
            Ok(Arc::new(BingSearch::new(&config.bing_url, key, timeout)?))
        }
        _ => Ok(Arc::new(DuckDuckGoSearch::new(&config.duckduckgo_url, timeout)?)),
    }
}

// =============================================================================
// DuckDuckGo (HTML endpoint, no key)
// =============================================================================

static RESULT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.result:not(.result--ad)").expect("valid selector"));
static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid selector"));
static SNIPPET_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("valid selector"));

pub struct DuckDuckGoSearch {
    endpoint: String,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Parse a results page. Result links go through a `/l/?uddg=` redirect
    /// whose parameter carries the target URL.
    pub fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
        let document = Html::parse_document(html);

        document
            .select(&RESULT_SELECTOR)
            .filter_map(|result| {
                let link = result.select(&TITLE_SELECTOR).next()?;
                let href = link.value().attr("href")?;
                let title = collapse_whitespace(&link.text().collect::<String>());
                let snippet = result
                    .select(&SNIPPET_SELECTOR)
                    .next()
                    .map(|s| collapse_whitespace(&s.text().collect::<String>()))
                    .unwrap_or_default();

                Some(SearchHit {
                    title,
                    url: resolve_redirect(href),
                    snippet,
                })
            })
            .filter(|hit| !hit.url.is_empty())
            .take(max_results)
            .collect()
    }
}

fn resolve_redirect(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    match url::Url::parse(&absolute) {
        Ok(parsed) => parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned())
            .unwrap_or(absolute),
        Err(_) => absolute,
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        debug!(query, "DuckDuckGo search");

        let html = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(format!("q={}", urlencoding::encode(query)))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(Self::parse_results(&html, max_results))
    }

    fn name(&self) -> &str {
        "duckduckgo"
    }
}

// =============================================================================
// Bing Web Search API
// =============================================================================

pub struct BingSearch {
    endpoint: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl BingSearch {
    pub fn new(endpoint: &str, api_key: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            api_key: SecretString::from(api_key),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages")]
    web_pages: Option<BingWebPages>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingPage>,
}

#[derive(Debug, Deserialize)]
struct BingPage {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl SearchProvider for BingSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        debug!(query, "Bing search");

        let response = self
            .client
            .get(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", self.api_key.expose_secret())
            .query(&[("q", query), ("count", max_results.to_string().as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::Search(format!(
                "Bing API error ({}): {}",
                status, body
            )));
        }

        let body: BingResponse = response.json().await?;
        Ok(body
            .web_pages
            .map(|p| p.value)
            .unwrap_or_default()
            .into_iter()
            .take(max_results)
            .map(|p| SearchHit {
                title: p.name,
                url: p.url,
                snippet: p.snippet,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "bing"
    }
}

// =============================================================================
// web_search tool
// =============================================================================

pub struct WebSearchTool {
    provider: SharedSearch,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(provider: SharedSearch, max_results: usize) -> Self {
        Self {
            provider,
            max_results,
        }
    }

    /// Run a query and render the digest the model reads
    pub async fn search(&self, query: &str) -> String {
        match self.provider.search(query, self.max_results).await {
            Ok(hits) => format_digest(&hits),
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Search failed");
                format!("Zoekfout: {}", e)
            }
        }
    }
}

/// `**title**\nURL: url\nsnippet` blocks separated by rules
pub fn format_digest(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "Geen zoekresultaten gevonden.".to_string();
    }

    hits.iter()
        .map(|hit| {
            let title = if hit.title.is_empty() {
                "Geen titel"
            } else {
                &hit.title
            };
            format!("**{}**\nURL: {}\n{}", title, hit.url, hit.snippet)
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Zoek op het internet naar informatie over een tool, privacy beleid, of compliance \
         documentatie."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "De zoekopdracht, bijv. 'Notion privacy policy GDPR'"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, args: Value) -> String {
        match args.get("query").and_then(Value::as_str) {
            Some(query) if !query.trim().is_empty() => self.search(query).await,
            _ => "Zoekfout: parameter 'query' ontbreekt".to_string(),
        }
    }
}
