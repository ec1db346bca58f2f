// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Ollama native API.
//!
//! The client carries no request timeout: generations may legitimately run
//! for minutes, and the relay stops reading as soon as the caller drops the
//! stream.

use async_trait::async_trait;
use hasko_config::model::OllamaConfig;
use hasko_core::{GenerateRequest, HaskoError, InferenceProvider, TextStream};
use tracing::debug;

use crate::ndjson::decode_ndjson;
use crate::types::{GenerateBody, ModelList};

fn provider_err(context: &str, e: reqwest::Error) -> HaskoError {
    HaskoError::Provider {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Ollama adapter implementing [`InferenceProvider`].
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    /// Creates a client for the API rooted at `config.base_url` (e.g. `http://localhost:11434/api`).
    pub fn new(config: &OllamaConfig) -> Result<Self, HaskoError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| provider_err("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn get_models(&self, path: &str) -> Result<Vec<String>, HaskoError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| provider_err("HTTP request failed", e))?;
        let response = ensure_success(response).await?;

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| provider_err("failed to parse model list", e))?;
        Ok(list.into_names())
    }
}

/// Maps a non-2xx response to a provider error carrying status and body.
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, HaskoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(HaskoError::Provider {
        message: format!("Ollama returned {status}: {body}"),
        source: None,
    })
}

#[async_trait]
impl InferenceProvider for OllamaClient {
    async fn list_models(&self) -> Result<Vec<String>, HaskoError> {
        self.get_models("tags").await
    }

    async fn running_models(&self) -> Result<Vec<String>, HaskoError> {
        self.get_models("ps").await
    }

    async fn launch(&self, model: &str) -> Result<(), HaskoError> {
        debug!(model, "requesting model load");
        let body = GenerateBody {
            model,
            prompt: None,
            stream: false,
        };
        let response = self
            .client
            .post(self.url("generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_err("HTTP request failed", e))?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn generate_stream(&self, request: GenerateRequest) -> Result<TextStream, HaskoError> {
        let body = GenerateBody {
            model: &request.model,
            prompt: Some(&request.prompt),
            stream: true,
        };
        let response = self
            .client
            .post(self.url("generate"))
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_err("HTTP request failed", e))?;
        let response = ensure_success(response).await?;
        debug!(model = %request.model, status = %response.status(), "generation stream opened");

        Ok(decode_ndjson(response.bytes_stream()))
    }
}
