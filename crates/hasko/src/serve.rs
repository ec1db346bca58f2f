// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hasko serve` command implementation.
//!
//! Builds the Ollama and Google clients, the memory store and the
//! conversation handler from one `HaskoConfig`, then serves HTTP until
//! SIGINT or SIGTERM.

use std::sync::Arc;

use hasko_agent::{ConversationHandler, install_signal_handler};
use hasko_config::HaskoConfig;
use hasko_context::Persona;
use hasko_core::{HaskoError, InferenceProvider};
use hasko_gateway::{GatewayState, start_server};
use hasko_memory::MemoryStore;
use hasko_ollama::OllamaClient;
use hasko_search::GoogleSearchClient;
use tracing::{info, warn};

/// Runs the `hasko serve` command.
pub async fn run_serve(config: HaskoConfig) -> Result<(), HaskoError> {
    info!(
        ollama = %config.ollama.base_url,
        default_model = %config.ollama.default_model,
        memory_file = %config.memory.file_path,
        "starting hasko serve"
    );

    let persona = Persona::load(&config.agent).await;
    let store = Arc::new(MemoryStore::from_config(&config.memory));
    let inference: Arc<dyn InferenceProvider> = Arc::new(OllamaClient::new(&config.ollama)?);

    let search = GoogleSearchClient::new(&config.search)?;
    if !search.is_configured() {
        warn!("search credentials not configured, web search requests will fail softly");
    }

    let handler = ConversationHandler::new(
        &config,
        persona,
        store,
        inference.clone(),
        Arc::new(search),
    );

    let cancel = install_signal_handler();
    let state = GatewayState {
        handler: Arc::new(handler),
        inference,
    };
    start_server(&config.server, state, cancel).await?;

    info!("hasko serve shutdown complete");
    Ok(())
}
