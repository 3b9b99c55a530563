//! Reference link search.

use inkpress_core::config::AppConfig;
use inkpress_core::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

const STUB_LINKS: [&str; 3] = [
    "https://example.com/article-1",
    "https://example.com/article-2",
    "https://example.com/article-3",
];

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    link: Option<String>,
}

/// Client for a SerpAPI-style search endpoint.
pub struct LinkFetcher {
    api_key: Option<String>,
    search_url: String,
    dry_run: bool,
    client: reqwest::Client,
}

impl LinkFetcher {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&cfg.user_agent)
            .build()?;
        Ok(Self {
            api_key: cfg.serpapi_key.clone(),
            search_url: cfg.search_url.clone(),
            dry_run: cfg.dry_run,
            client,
        })
    }

    /// Top result URLs for `query`, at most `max_links`.
    ///
    /// Dry-run mode or a missing API key yields deterministic stub links so
    /// the pipeline stays runnable offline. No results is not an error.
    pub async fn fetch_links(&self, query: &str, max_links: usize) -> Result<Vec<String>> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !self.dry_run => key,
            _ => {
                info!("dry-run or missing search key, returning stub links");
                return Ok(STUB_LINKS
                    .iter()
                    .take(max_links)
                    .map(|s| s.to_string())
                    .collect());
            }
        };

        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("q", query),
                ("api_key", api_key),
                ("num", &max_links.to_string()),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let parsed: SearchResponse = response.json().await?;
        let links: Vec<String> = parsed
            .organic_results
            .into_iter()
            .filter_map(|r| r.link)
            .take(max_links)
            .collect();
        if links.is_empty() {
            warn!(query, "no links found");
        }
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpress_core::AppConfig;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn missing_key_returns_stub_links() {
        let fetcher = LinkFetcher::new(&AppConfig::default()).unwrap();
        let links = fetcher.fetch_links("rust caching", 2).await.unwrap();
        assert_eq!(links.len(), 2);
        assert!(links[0].starts_with("https://example.com/"));
    }

    #[tokio::test]
    async fn results_are_extracted_and_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "topic"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organic_results": [
                    {"link": "https://a"},
                    {"position": 2},
                    {"link": "https://b"},
                    {"link": "https://c"}
                ]
            })))
            .mount(&server)
            .await;

        let cfg = AppConfig {
            serpapi_key: Some("KEY".to_string()),
            search_url: server.uri(),
            ..AppConfig::default()
        };
        let fetcher = LinkFetcher::new(&cfg).unwrap();
        let links = fetcher.fetch_links("topic", 2).await.unwrap();
        assert_eq!(links, vec!["https://a", "https://b"]);
    }

    #[tokio::test]
    async fn no_results_is_empty_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let cfg = AppConfig {
            serpapi_key: Some("KEY".to_string()),
            search_url: server.uri(),
            ..AppConfig::default()
        };
        let fetcher = LinkFetcher::new(&cfg).unwrap();
        assert!(fetcher.fetch_links("topic", 5).await.unwrap().is_empty());
    }
}
