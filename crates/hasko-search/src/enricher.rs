// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web enrichment: one search call, then a model-written summary.
//!
//! Never returns an error. Failures become fixed user-facing strings.

use std::sync::Arc;

use futures::StreamExt;
use hasko_core::{GenerateRequest, HaskoError, InferenceProvider, SearchProvider};
use tracing::{debug, error, info, warn};

/// Reply when the provider reports no result items.
pub const NOTHING_FOUND: &str = "I couldn't find any information related to your query.";

/// Reply for transport/HTTP failures and missing credentials.
pub const RETRIEVE_FAILED: &str = "I couldn't retrieve information from the internet right now.";

/// Reply for any other failure.
pub const ERROR_OCCURRED: &str = "An error occurred while retrieving information.";

/// Searches the web and summarizes the snippets with the chat model.
pub struct WebEnricher {
    search: Arc<dyn SearchProvider>,
    inference: Arc<dyn InferenceProvider>,
    persona: String,
    max_snippet_chars: usize,
}

impl WebEnricher {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        inference: Arc<dyn InferenceProvider>,
        persona: impl Into<String>,
        max_snippet_chars: usize,
    ) -> Self {
        Self {
            search,
            inference,
            persona: persona.into(),
            max_snippet_chars,
        }
    }

    /// Returns a summary of what the web says about `query`, or a fixed
    /// apology string.
    pub async fn search_and_summarize(&self, query: &str, model: &str) -> String {
        info!(query, model, "starting web search");
        match self.summarize(query, model).await {
            Ok(Some(text)) => text,
            Ok(None) => NOTHING_FOUND.to_string(),
            Err(e) if e.is_transport() || matches!(e, HaskoError::Config(_)) => {
                error!(error = %e, "web search failed");
                RETRIEVE_FAILED.to_string()
            }
            Err(e) => {
                error!(error = %e, "unexpected error during web search");
                ERROR_OCCURRED.to_string()
            }
        }
    }

    /// Searches and summarizes, surfacing failures.
    ///
    /// `Ok(None)` means the provider returned no items; the model is not called.
    pub async fn summarize(&self, query: &str, model: &str) -> Result<Option<String>, HaskoError> {
        let items = match self.search.search(query).await? {
            Some(items) if !items.is_empty() => items,
            _ => {
                warn!(query, "no search results found");
                return Ok(None);
            }
        };

        let joined = items
            .iter()
            .map(|item| item.snippet.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ");
        let snippets = truncate_chars(&joined, self.max_snippet_chars);
        debug!(chars = snippets.chars().count(), "combined snippets for summarization");

        let prompt = summary_prompt(&self.persona, snippets);
        let mut stream = self
            .inference
            .generate_stream(GenerateRequest {
                model: model.to_string(),
                prompt,
            })
            .await?;

        let mut summary = String::new();
        while let Some(fragment) = stream.next().await {
            summary.push_str(&fragment?);
        }

        let summary = summary.trim().to_string();
        info!(chars = summary.chars().count(), "summarization completed");
        Ok(Some(summary))
    }
}

/// Instruction wrapping the snippets for the summarizing model.
pub fn summary_prompt(persona: &str, snippets: &str) -> String {
    format!(
        "You are {persona}, a helpful AI assistant. Summarize the following information in a clear and concise way:\n{snippets}\n\nSummary:"
    )
}

/// The first `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
