// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent classification for the Hasko conversation handler.
//!
//! This crate provides:
//! - [`Intent`]: the enumerated outcomes the handler branches on
//! - [`IntentClassifier`]: the seam the handler depends on
//! - [`PatternClassifier`]: the default phrase-matching implementation

pub mod classifier;
pub mod intent;

pub use classifier::{ClassifierContext, IntentClassifier, PatternClassifier, SEARCH_KEYWORDS};
pub use intent::Intent;
