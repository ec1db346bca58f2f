// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hasko relay.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Hasko workspace. Upstream adapters
//! implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HaskoError;
pub use traits::{InferenceProvider, SearchProvider, TextStream};
pub use types::{GenerateRequest, Role, SearchItem, Turn};
