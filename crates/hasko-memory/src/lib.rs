// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation memory for the Hasko relay.
//!
//! A single JSON document maps chat ids to their history, remembered facts
//! and any change awaiting confirmation. [`FactExtractor`] proposes fact
//! updates from one message; [`MemoryStore`] owns the document on disk.

pub mod extractor;
pub mod store;
pub mod types;

pub use extractor::{Extraction, FactExtractor};
pub use store::MemoryStore;
pub use types::{ChatRecord, FactDelta, MemoryDocument, USER_LOCATION, USER_NAME};
