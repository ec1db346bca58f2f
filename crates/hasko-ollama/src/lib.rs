// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama native inference adapter for the Hasko relay.
//!
//! Talks to the local Ollama server's `/api` endpoints:
//! - `GET /tags` and `GET /ps` for installed and loaded models
//! - `POST /generate` for model loading and streamed generation
//!
//! Streamed generations arrive as newline-delimited JSON and are decoded by
//! [`ndjson::decode_ndjson`] into plain text fragments.

pub mod client;
pub mod ndjson;
pub mod types;

pub use client::OllamaClient;
