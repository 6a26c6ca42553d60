//! Tool finder: free-text query → up to three product candidates.

use serde::Deserialize;
use tracing::{debug, warn};

use super::prompts::{finder_prompt, finder_query};
use crate::ai::{ChatMessage, ChatRequest, SharedProvider, decode_payload};
use crate::constants::search::{FINDER_MAX_CANDIDATES, FINDER_MAX_RESULTS};
use crate::tools::{SearchHit, SharedSearch};
use crate::types::{Result, ToolCandidate};

/// Reply entry; the model sometimes leaves fields out
#[derive(Debug, Deserialize)]
struct RawCandidate {
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

pub struct ToolFinder {
    search: SharedSearch,
    /// Without a model the finder echoes the query
    provider: Option<SharedProvider>,
}

impl ToolFinder {
    pub fn new(search: SharedSearch, provider: Option<SharedProvider>) -> Self {
        Self { search, provider }
    }

    /// Never fails: any problem yields the query itself as the only candidate
    pub async fn find(&self, query: &str) -> Vec<ToolCandidate> {
        match self.try_find(query).await {
            Ok(candidates) if !candidates.is_empty() => candidates,
            Ok(_) => vec![ToolCandidate::from_query(query)],
            Err(e) => {
                warn!(query, error = %e, "Tool search failed");
                vec![ToolCandidate::from_query(query)]
            }
        }
    }

    async fn try_find(&self, query: &str) -> Result<Vec<ToolCandidate>> {
        let hits = self
            .search
            .search(&finder_query(query), FINDER_MAX_RESULTS)
            .await?;

        let Some(provider) = &self.provider else {
            return Ok(Vec::new());
        };

        let summary = search_summary(&hits);
        if summary.is_empty() {
            return Ok(Vec::new());
        }

        let request = ChatRequest::new(vec![ChatMessage::user(finder_prompt(query, &summary))])
            .with_temperature(0.0);
        let response = provider.chat(request).await?;

        let raw: Vec<RawCandidate> = decode_payload(response.message.text())?;
        debug!(query, candidates = raw.len(), "Tool name extraction finished");

        Ok(raw
            .into_iter()
            .filter(|c| !c.name.trim().is_empty())
            .take(FINDER_MAX_CANDIDATES)
            .map(|c| ToolCandidate {
                name: c.name.trim().to_string(),
                url: c.url,
                description: c.description,
            })
            .collect())
    }
}

/// `- Title: … | URL: …` lines for hits that have both
fn search_summary(hits: &[SearchHit]) -> String {
    hits.iter()
        .filter(|h| !h.title.is_empty() && !h.url.is_empty())
        .map(|h| format!("- Title: {} | URL: {}", h.title, h.url))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::react::tests::ScriptedProvider;
    use crate::tools::SearchProvider;
    use crate::types::CheckerError;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct StubSearch {
        hits: Vec<SearchHit>,
        fail: bool,
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
            assert!(query.ends_with("software official website"));
            assert_eq!(max_results, FINDER_MAX_RESULTS);
            if self.fail {
                return Err(CheckerError::Search("blocked".to_string()));
            }
            Ok(self.hits.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn search(fail: bool) -> SharedSearch {
        Arc::new(StubSearch {
            hits: vec![SearchHit {
                title: "Slack is your productivity platform".to_string(),
                url: "https://slack.com".to_string(),
                snippet: String::new(),
            }],
            fail,
        })
    }

    #[tokio::test]
    async fn test_model_candidates_capped_at_three() {
        let reply = r#"```json
[{"name": "Slack", "url": "https://slack.com"},
 {"name": "Slack Connect", "url": "https://slack.com/connect"},
 {"name": "Slab", "url": "https://slab.com"},
 {"name": "Stack", "url": "https://stack.com"}]
```"#;
        let provider = ScriptedProvider::new(vec![Ok(ChatMessage::assistant(reply))]);
        let shared: SharedProvider = provider.clone();
        let finder = ToolFinder::new(search(false), Some(shared));

        let candidates = finder.find("salck").await;
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].name, "Slack");
        assert_eq!(candidates[0].url, "https://slack.com");
        assert_eq!(candidates[0].description, "");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests[0].temperature, Some(0.0));
        assert!(requests[0].messages[0].text().contains("- Title: Slack is your productivity platform | URL: https://slack.com"));
    }

    #[tokio::test]
    async fn test_falls_back_to_query() {
        let expected = vec![ToolCandidate::from_query("  salck ")];

        let finder = ToolFinder::new(search(true), None);
        assert_eq!(finder.find("  salck ").await, expected);

        let finder = ToolFinder::new(search(false), None);
        assert_eq!(finder.find("  salck ").await, expected);

        let provider: SharedProvider =
            ScriptedProvider::new(vec![Ok(ChatMessage::assistant("not json"))]);
        let finder = ToolFinder::new(search(false), Some(provider));
        assert_eq!(finder.find("  salck ").await, expected);

        let provider: SharedProvider = ScriptedProvider::new(vec![Ok(ChatMessage::assistant("[]"))]);
        let finder = ToolFinder::new(search(false), Some(provider));
        assert_eq!(finder.find("  salck ").await, expected);
    }
}
