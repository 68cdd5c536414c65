use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{configuration::SearchSettings, domain::search_result::SearchResult};

use super::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("No response from search provider: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Search provider answered with status {0}")]
    Status(StatusCode),
    #[error("Search failed after {attempts} attempts, last error: {last}")]
    Exhausted { attempts: u32, last: String },
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Runs one search, reporting exhausted retries as an error.
    async fn try_search(
        &self,
        query: &str,
        api_key: &str,
    ) -> Result<Vec<SearchResult>, SearchError>;

    /// Same as `try_search` but a failed search reads as "no results".
    async fn search(&self, query: &str, api_key: &str) -> Vec<SearchResult> {
        self.try_search(query, api_key).await.unwrap_or_default()
    }
}

pub struct SerpApiClient {
    client: Client,
    url: String,
    num_results: u32,
    retry_policy: RetryPolicy,
}

#[derive(Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
    api_key: &'a str,
    num: u32,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<SearchResult>,
}

impl SerpApiClient {
    pub fn new(settings: &SearchSettings) -> Self {
        SerpApiClient {
            client: Client::new(),
            url: settings.base_url.clone(),
            num_results: settings.num_results,
            retry_policy: settings.retry_policy(),
        }
    }

    async fn search_once(
        &self,
        query: &str,
        api_key: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let res = self
            .client
            .get(&self.url)
            .query(&SearchQuery {
                q: query,
                api_key,
                num: self.num_results,
            })
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(SearchError::Status(res.status()));
        }

        let body = res.json::<SearchResponse>().await?;
        Ok(body.organic_results)
    }
}

#[async_trait]
impl WebSearcher for SerpApiClient {
    async fn try_search(
        &self,
        query: &str,
        api_key: &str,
    ) -> Result<Vec<SearchResult>, SearchError> {
        log::info!("Searching the web for: {}", query);

        let results = self
            .retry_policy
            .run(move |_| self.search_once(query, api_key))
            .await
            .map_err(|e| SearchError::Exhausted {
                attempts: self.retry_policy.max_attempts,
                last: e.to_string(),
            })?;

        log::info!("Found {} organic results for: {}", results.len(), query);
        Ok(results)
    }
}
