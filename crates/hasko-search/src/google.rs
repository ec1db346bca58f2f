// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Custom Search JSON API client.

use std::time::Duration;

use async_trait::async_trait;
use hasko_config::model::SearchConfig;
use hasko_core::{HaskoError, SearchItem, SearchProvider};
use serde::Deserialize;
use tracing::debug;

fn search_err(context: &str, e: reqwest::Error) -> HaskoError {
    HaskoError::Search {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

/// Client for `GET <base_url>?key=&cx=&q=`.
///
/// Requests are bounded by `search.timeout_secs`.
#[derive(Debug, Clone)]
pub struct GoogleSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    engine_id: Option<String>,
}

impl GoogleSearchClient {
    pub fn new(config: &SearchConfig) -> Result<Self, HaskoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| search_err("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            engine_id: config.engine_id.clone().filter(|k| !k.is_empty()),
        })
    }

    /// Both the API key and the engine id are set.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.engine_id.is_some()
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str) -> Result<Option<Vec<SearchItem>>, HaskoError> {
        let (Some(key), Some(cx)) = (&self.api_key, &self.engine_id) else {
            return Err(HaskoError::Config(
                "search.api_key and search.engine_id must be set for web search".into(),
            ));
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", key.as_str()), ("cx", cx.as_str()), ("q", query)])
            .send()
            .await
            .map_err(|e| search_err("HTTP request failed", e))?;

        let status = response.status();
        debug!(status = %status, "search response received");
        let response = response
            .error_for_status()
            .map_err(|e| search_err("search provider rejected request", e))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| search_err("failed to parse search response", e))?;
        Ok(body.items)
    }
}
