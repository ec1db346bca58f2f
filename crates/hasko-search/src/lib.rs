// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Web search enrichment for the Hasko relay.
//!
//! [`GoogleSearchClient`] implements [`hasko_core::SearchProvider`] against
//! the Google Custom Search JSON API. [`WebEnricher`] turns a query into a
//! short summary written by the chat model.

pub mod enricher;
pub mod google;

pub use enricher::{ERROR_OCCURRED, NOTHING_FOUND, RETRIEVE_FAILED, WebEnricher};
pub use google::GoogleSearchClient;
