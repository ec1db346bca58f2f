// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hasko relay.

use thiserror::Error;

/// The primary error type used across provider traits and core operations.
#[derive(Debug, Error)]
pub enum HaskoError {
    /// Configuration errors (invalid values, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// Memory file errors (read, write, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Inference server errors (unreachable, non-2xx, malformed stream).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Search provider errors (unreachable, non-2xx, bad payload).
    #[error("search error: {message}")]
    Search {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested model could not be confirmed running.
    #[error("Failed to start or connect to model '{model}'")]
    ModelUnavailable { model: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HaskoError {
    /// Returns true for errors raised while talking to an upstream over HTTP.
    pub fn is_transport(&self) -> bool {
        matches!(self, HaskoError::Provider { .. } | HaskoError::Search { .. })
    }
}
