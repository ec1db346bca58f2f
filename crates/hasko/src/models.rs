// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hasko models` command implementation.

use hasko_config::HaskoConfig;
use hasko_core::{HaskoError, InferenceProvider};
use hasko_ollama::OllamaClient;

/// Prints one installed model name per line.
pub async fn run_models(config: &HaskoConfig) -> Result<(), HaskoError> {
    let client = OllamaClient::new(&config.ollama)?;
    let models = client.list_models().await?;

    if models.is_empty() {
        eprintln!("no models installed on {}", config.ollama.base_url);
    }
    for model in models {
        println!("{model}");
    }
    Ok(())
}
