// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ollama native API wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /generate`.
///
/// With `prompt: None` and `stream: false` the server only loads the model.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateBody<'a> {
    pub model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<&'a str>,
    pub stream: bool,
}

/// One model entry as returned by `GET /tags` and `GET /ps`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelEntry {
    pub name: String,
}

/// Response of `GET /tags` (installed) and `GET /ps` (loaded).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}

impl ModelList {
    pub fn into_names(self) -> Vec<String> {
        self.models.into_iter().map(|m| m.name).collect()
    }
}

/// One newline-delimited object of a streamed generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<String>,
}
