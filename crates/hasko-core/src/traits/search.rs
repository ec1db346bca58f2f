// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search provider trait for web enrichment.

use async_trait::async_trait;

use crate::error::HaskoError;
use crate::types::SearchItem;

/// Adapter for an external web search API.
#[async_trait]
pub trait SearchProvider: Send + Sync + 'static {
    /// Runs one search and returns its result items.
    ///
    /// `Ok(None)` means the provider answered but reported no items at all.
    async fn search(&self, query: &str) -> Result<Option<Vec<SearchItem>>, HaskoError>;
}
