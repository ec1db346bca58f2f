// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message conversation handling.
//!
//! Each message is classified once, then handled by exactly one branch:
//! change request, new fact, confirmation, direct recall, web search or
//! streamed generation. Every branch persists inside a single locked
//! memory transaction before the reply leaves the handler.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use hasko_config::HaskoConfig;
use hasko_context::{Persona, PromptBuilder};
use hasko_core::{GenerateRequest, HaskoError, InferenceProvider, SearchProvider, Turn};
use hasko_memory::{MemoryStore, USER_NAME};
use hasko_router::{ClassifierContext, Intent, IntentClassifier, PatternClassifier};
use hasko_search::WebEnricher;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::launcher::ModelLauncher;
use crate::replies;

/// One incoming chat message.
#[derive(Debug, Clone)]
pub struct SendMessage {
    pub chat_id: String,
    pub content: String,
    /// Requested model; empty means the configured default.
    pub model: String,
}

/// What goes back to the client.
#[derive(Debug)]
pub enum Reply {
    /// A complete canned or search reply.
    Text(String),
    /// Fragments of a streamed generation, in arrival order.
    Stream(mpsc::Receiver<String>),
}

enum Relay {
    Completed,
    Disconnected,
}

/// Orchestrates one message end to end.
pub struct ConversationHandler {
    store: Arc<MemoryStore>,
    inference: Arc<dyn InferenceProvider>,
    classifier: Arc<dyn IntentClassifier>,
    launcher: ModelLauncher,
    enricher: WebEnricher,
    prompts: PromptBuilder,
    default_model: String,
    stream_buffer: usize,
    augment_generation: bool,
}

impl ConversationHandler {
    pub fn new(
        config: &HaskoConfig,
        persona: Persona,
        store: Arc<MemoryStore>,
        inference: Arc<dyn InferenceProvider>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let enricher = WebEnricher::new(
            search,
            inference.clone(),
            persona.name(),
            config.search.max_snippet_chars,
        );
        Self {
            store,
            launcher: ModelLauncher::new(
                inference.clone(),
                Duration::from_secs(config.ollama.launch_settle_secs),
            ),
            inference,
            classifier: Arc::new(PatternClassifier::new()),
            enricher,
            prompts: PromptBuilder::new(persona),
            default_model: config.ollama.default_model.clone(),
            stream_buffer: config.server.stream_buffer.max(1),
            augment_generation: config.search.augment_generation,
        }
    }

    /// Replaces the default pattern classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    /// Resolves an empty model name to the configured default.
    pub fn resolve_model<'a>(&'a self, requested: &'a str) -> &'a str {
        let requested = requested.trim();
        if requested.is_empty() {
            &self.default_model
        } else {
            requested
        }
    }

    /// Handles one message.
    ///
    /// Errors with [`HaskoError::ModelUnavailable`] before touching memory
    /// when the model cannot be confirmed running.
    pub async fn handle(&self, msg: SendMessage) -> Result<Reply, HaskoError> {
        let model = self.resolve_model(&msg.model).to_string();
        let chat_id = msg.chat_id.as_str();
        info!(chat_id, model = %model, "received message");

        if !self.launcher.ensure_running(&model).await {
            error!(chat_id, model = %model, "failed to start or connect to model");
            return Err(HaskoError::ModelUnavailable { model });
        }

        let snapshot = self.store.snapshot(chat_id).await;
        let ctx = ClassifierContext {
            has_pending_change: snapshot.pending_change.is_some(),
        };
        let intent = self.classifier.classify(&msg.content, &ctx);
        info!(chat_id, intent = %intent, "classified message");

        match intent {
            Intent::ChangeRequest(delta) => {
                self.store
                    .update_chat(chat_id, |record| {
                        record.stage_change(&delta);
                        record.push(Turn::assistant(replies::CONFIRM_CHANGE));
                    })
                    .await?;
                Ok(Reply::Text(replies::CONFIRM_CHANGE.to_string()))
            }
            Intent::PlainFact(delta) => {
                let text = self
                    .store
                    .update_chat(chat_id, |record| {
                        record.store_facts(&delta);
                        let text = replies::acknowledge(record.fact(USER_NAME));
                        record.push(Turn::assistant(&text));
                        text
                    })
                    .await?;
                Ok(Reply::Text(text))
            }
            Intent::ConfirmChange { accepted } => {
                let text = self
                    .store
                    .update_chat(chat_id, |record| {
                        let text = if accepted {
                            let changed = record.commit_pending();
                            info!(chat_id, changed, "pending change applied");
                            replies::CHANGE_APPLIED
                        } else {
                            record.discard_pending();
                            info!(chat_id, "pending change discarded");
                            replies::CHANGE_DISCARDED
                        };
                        record.push(Turn::assistant(text));
                        text
                    })
                    .await?;
                Ok(Reply::Text(text.to_string()))
            }
            Intent::DirectRecall { key } => {
                let text = self
                    .store
                    .update_chat(chat_id, |record| {
                        let text = replies::recall(key, record.fact(key));
                        record.push(Turn::assistant(&text));
                        text
                    })
                    .await?;
                Ok(Reply::Text(text))
            }
            Intent::SearchRequest { query } if self.augment_generation => {
                info!(chat_id, query = %query, "searching to augment generation");
                let web = match self.enricher.summarize(&query, &model).await {
                    Ok(summary) => summary,
                    Err(e) => {
                        warn!(chat_id, error = %e, "web search failed, generating without it");
                        None
                    }
                };
                self.generate(chat_id, &msg.content, model, web.as_deref())
                    .await
            }
            Intent::SearchRequest { query } => {
                info!(chat_id, query = %query, "performing search");
                let summary = self.enricher.search_and_summarize(&query, &model).await;
                let text = format!("{}{summary}", replies::SEARCH_PREAMBLE);
                self.store
                    .update_chat(chat_id, |record| record.push(Turn::assistant(&text)))
                    .await?;
                Ok(Reply::Text(text))
            }
            Intent::Generation => self.generate(chat_id, &msg.content, model, None).await,
        }
    }

    /// Persists the user turn, then starts relaying the model's reply.
    async fn generate(
        &self,
        chat_id: &str,
        content: &str,
        model: String,
        web_summary: Option<&str>,
    ) -> Result<Reply, HaskoError> {
        let prompt = self
            .store
            .update_chat(chat_id, |record| {
                let prompt = self.prompts.build(
                    &record.conversation_history,
                    &record.memory_store,
                    content,
                    web_summary,
                );
                record.push(Turn::user(content));
                prompt
            })
            .await?;
        debug!(chat_id, chars = prompt.len(), "constructed prompt");

        let (tx, rx) = mpsc::channel(self.stream_buffer);
        tokio::spawn(relay(
            self.inference.clone(),
            self.store.clone(),
            chat_id.to_string(),
            GenerateRequest { model, prompt },
            tx,
        ));
        Ok(Reply::Stream(rx))
    }
}

/// Producer task: forwards fragments into `tx`, then records the reply.
///
/// Returning drops the upstream stream, which closes the connection.
async fn relay(
    inference: Arc<dyn InferenceProvider>,
    store: Arc<MemoryStore>,
    chat_id: String,
    request: GenerateRequest,
    tx: mpsc::Sender<String>,
) {
    let mut reply = String::new();
    match forward(inference.as_ref(), request, &tx, &mut reply).await {
        Ok(Relay::Completed) => {
            debug!(chat_id = %chat_id, chars = reply.len(), "generation completed");
        }
        Ok(Relay::Disconnected) => {
            info!(chat_id = %chat_id, "client disconnected, generation stopped");
            return;
        }
        Err(e) => {
            let fragment = if e.is_transport() {
                error!(chat_id = %chat_id, error = %e, "HTTP error during LLM communication");
                replies::GENERATION_FAILED
            } else {
                error!(chat_id = %chat_id, error = %e, "unexpected error during LLM communication");
                replies::UNEXPECTED_ERROR
            };
            if tx.send(fragment.to_string()).await.is_err() {
                return;
            }
        }
    }

    if reply.is_empty() {
        return;
    }
    if let Err(e) = store
        .update_chat(&chat_id, |record| record.push(Turn::assistant(reply)))
        .await
    {
        error!(chat_id = %chat_id, error = %e, "failed to persist assistant reply");
    }
}

async fn forward(
    inference: &dyn InferenceProvider,
    request: GenerateRequest,
    tx: &mpsc::Sender<String>,
    reply: &mut String,
) -> Result<Relay, HaskoError> {
    let mut stream = tokio::select! {
        _ = tx.closed() => return Ok(Relay::Disconnected),
        opened = inference.generate_stream(request) => opened?,
    };

    loop {
        let next = tokio::select! {
            _ = tx.closed() => return Ok(Relay::Disconnected),
            next = stream.next() => next,
        };
        let Some(fragment) = next else {
            return Ok(Relay::Completed);
        };
        let fragment = fragment?;
        reply.push_str(&fragment);
        if tx.send(fragment).await.is_err() {
            return Ok(Relay::Disconnected);
        }
    }
}
