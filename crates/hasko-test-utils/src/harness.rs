// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end conversation tests.
//!
//! `TestHarness` assembles a real `ConversationHandler` over mock upstreams
//! and a memory file in a temp directory. `send()` drives one message and
//! collects the full reply.

use std::sync::Arc;

use hasko_agent::{ConversationHandler, Reply, SendMessage};
use hasko_config::HaskoConfig;
use hasko_context::Persona;
use hasko_core::HaskoError;
use hasko_memory::{ChatRecord, MemoryStore};

use crate::mock_inference::MockInference;
use crate::mock_search::MockSearch;

/// Default model name used by the harness.
pub const TEST_MODEL: &str = "test-model";

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    inference: MockInference,
    search: MockSearch,
    config: HaskoConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = HaskoConfig::default();
        config.ollama.default_model = TEST_MODEL.to_string();
        config.ollama.launch_settle_secs = 0;
        Self {
            inference: MockInference::new().with_running(&[TEST_MODEL]),
            search: MockSearch::default(),
            config,
        }
    }

    pub fn with_inference(mut self, inference: MockInference) -> Self {
        self.inference = inference;
        self
    }

    pub fn with_search(mut self, search: MockSearch) -> Self {
        self.search = search;
        self
    }

    /// Adjusts the configuration before the handler is built.
    pub fn with_config(mut self, f: impl FnOnce(&mut HaskoConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Build the test harness with a fresh memory file.
    pub fn build(self) -> Result<TestHarness, HaskoError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HaskoError::Storage { source: e.into() })?;

        let mut config = self.config;
        config.memory.file_path = temp_dir
            .path()
            .join("memory.json")
            .to_string_lossy()
            .into_owned();

        let store = Arc::new(MemoryStore::from_config(&config.memory));
        let inference = Arc::new(self.inference);
        let search = Arc::new(self.search);
        let persona = Persona::default_for(&config.agent.name);

        let handler = ConversationHandler::new(
            &config,
            persona,
            store.clone(),
            inference.clone(),
            search.clone(),
        );

        Ok(TestHarness {
            handler: Arc::new(handler),
            store,
            inference,
            search,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete conversation stack for integration tests.
pub struct TestHarness {
    pub handler: Arc<ConversationHandler>,
    pub store: Arc<MemoryStore>,
    pub inference: Arc<MockInference>,
    pub search: Arc<MockSearch>,
    pub config: HaskoConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A harness with default mocks.
    pub fn new() -> Result<Self, HaskoError> {
        Self::builder().build()
    }

    /// Sends one message with the default model and returns the raw reply.
    pub async fn reply(&self, chat_id: &str, content: &str) -> Result<Reply, HaskoError> {
        self.handler
            .handle(SendMessage {
                chat_id: chat_id.to_string(),
                content: content.to_string(),
                model: String::new(),
            })
            .await
    }

    /// Sends one message and returns the reply as received fragment by fragment.
    pub async fn send_fragments(
        &self,
        chat_id: &str,
        content: &str,
    ) -> Result<Vec<String>, HaskoError> {
        match self.reply(chat_id, content).await? {
            Reply::Text(text) => Ok(vec![text]),
            Reply::Stream(mut rx) => {
                let mut fragments = Vec::new();
                while let Some(fragment) = rx.recv().await {
                    fragments.push(fragment);
                }
                Ok(fragments)
            }
        }
    }

    /// Sends one message and returns the concatenated reply.
    pub async fn send(&self, chat_id: &str, content: &str) -> Result<String, HaskoError> {
        Ok(self.send_fragments(chat_id, content).await?.concat())
    }

    /// The persisted state of one chat.
    pub async fn record(&self, chat_id: &str) -> ChatRecord {
        self.store.snapshot(chat_id).await
    }
}
