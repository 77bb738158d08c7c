//! Web search backed by the Tavily API
//!
//! Never fails outward: a missing key, a transport error or an empty result
//! set all come back as explanatory text.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Reply when no API key is configured
pub const NOT_CONFIGURED: &str =
    "No results: web search is not configured (TAVILY_API_KEY not set)";

/// Reply when the provider found nothing
pub const NO_RESULTS: &str = "No results found";

const SNIPPET_CHARS: usize = 200;
const SNIPPET_RESULTS: usize = 3;

/// Search provider settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub max_results: u32,
    pub timeout_seconds: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.tavily.com/search".to_string(),
            max_results: 5,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchReply {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// Web search client
#[derive(Debug, Clone)]
pub struct WebSearch {
    client: reqwest::Client,
    config: SearchConfig,
}

impl WebSearch {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    /// Run one search and render the reply as text
    pub async fn search(&self, query: &str) -> String {
        let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            debug!(query, "web search skipped: no API key");
            return NOT_CONFIGURED.to_string();
        };

        let body = serde_json::json!({
            "api_key": api_key,
            "query": query,
            "search_depth": "basic",
            "include_answer": true,
            "max_results": self.config.max_results,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status);

        let reply = match response {
            Ok(resp) => resp.json::<SearchReply>().await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(reply) => render_reply(&reply),
            Err(e) => {
                warn!(query, error = %e, "web search failed");
                format!("Search error: {}", e)
            }
        }
    }
}

fn render_reply(reply: &SearchReply) -> String {
    if let Some(answer) = reply.answer.as_deref().filter(|a| !a.is_empty()) {
        let sources: Vec<&str> = reply.results.iter().map(|r| r.url.as_str()).collect();
        return format!("Answer: {}\n\nSources: {}", answer, sources.join(", "));
    }

    if reply.results.is_empty() {
        return NO_RESULTS.to_string();
    }

    reply
        .results
        .iter()
        .take(SNIPPET_RESULTS)
        .map(|r| {
            let snippet: String = r.content.chars().take(SNIPPET_CHARS).collect();
            format!("Title: {}\nURL: {}\nContent: {}...", r.title, r.url, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(json: &str) -> SearchReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_answer_with_sources() {
        let r = reply(
            r#"{"answer": "About 8.3 million", "results": [{"url": "https://a"}, {"url": "https://b"}]}"#,
        );
        assert_eq!(
            render_reply(&r),
            "Answer: About 8.3 million\n\nSources: https://a, https://b"
        );
    }

    #[test]
    fn test_snippets_limited_to_three() {
        let long = "x".repeat(500);
        let json = format!(
            r#"{{"answer": null, "results": [
                {{"title": "t1", "url": "u1", "content": "{long}"}},
                {{"title": "t2", "url": "u2", "content": "c2"}},
                {{"title": "t3", "url": "u3", "content": "c3"}},
                {{"title": "t4", "url": "u4", "content": "c4"}}
            ]}}"#
        );
        let text = render_reply(&reply(&json));
        assert!(text.starts_with("Title: t1\nURL: u1\nContent: "));
        assert!(text.contains(&format!("{}...", "x".repeat(200))));
        assert!(!text.contains(&"x".repeat(201)));
        assert!(text.contains("Title: t3"));
        assert!(!text.contains("Title: t4"));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(render_reply(&reply(r#"{"results": []}"#)), NO_RESULTS);
    }

    #[tokio::test]
    async fn test_missing_key_degrades_to_text() {
        let search = WebSearch::new(SearchConfig::default());
        assert!(!search.is_configured());
        assert_eq!(search.search("coffee shops in SF").await, NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_text() {
        let search = WebSearch::new(SearchConfig {
            api_key: Some("tvly-test".to_string()),
            endpoint: "http://127.0.0.1:9/search".to_string(),
            max_results: 5,
            timeout_seconds: 2,
        });
        let text = search.search("anything").await;
        assert!(text.starts_with("Search error: "), "{text}");
    }
}
