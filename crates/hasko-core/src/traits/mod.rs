// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream provider traits.
//!
//! Both traits use `#[async_trait]` so they can be held as trait objects
//! by the conversation handler and swapped for mocks in tests.

pub mod inference;
pub mod search;

pub use inference::{InferenceProvider, TextStream};
pub use search::SearchProvider;
