// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock web search provider.

use std::sync::Mutex;

use async_trait::async_trait;
use hasko_core::{HaskoError, SearchItem, SearchProvider};

enum Outcome {
    Items(Vec<SearchItem>),
    NoItems,
    TransportError,
}

/// A search provider returning one fixed outcome and recording queries.
pub struct MockSearch {
    outcome: Outcome,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    /// Answers every query with one item per snippet.
    pub fn with_snippets(snippets: &[&str]) -> Self {
        let items = snippets
            .iter()
            .map(|s| SearchItem {
                snippet: Some(s.to_string()),
                ..SearchItem::default()
            })
            .collect();
        Self::with_outcome(Outcome::Items(items))
    }

    /// Reports no items at all.
    pub fn empty() -> Self {
        Self::with_outcome(Outcome::NoItems)
    }

    /// Fails every query with a transport error.
    pub fn failing() -> Self {
        Self::with_outcome(Outcome::TransportError)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(&self, query: &str) -> Result<Option<Vec<SearchItem>>, HaskoError> {
        self.queries.lock().unwrap().push(query.to_string());
        match &self.outcome {
            Outcome::Items(items) => Ok(Some(items.clone())),
            Outcome::NoItems => Ok(None),
            Outcome::TransportError => Err(HaskoError::Search {
                message: "mock search failure".into(),
                source: None,
            }),
        }
    }
}
