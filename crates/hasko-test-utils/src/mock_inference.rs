// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference server for deterministic testing.
//!
//! `MockInference` implements `InferenceProvider` with scripted fragment
//! streams, a controllable set of loaded models, and counters that tests
//! can assert on.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use hasko_core::{GenerateRequest, HaskoError, InferenceProvider, TextStream};

/// One step of a scripted generation.
#[derive(Debug, Clone)]
pub enum MockChunk {
    /// A text fragment.
    Text(String),
    /// A transport failure mid-stream.
    TransportError(String),
    /// A non-transport failure mid-stream.
    InternalError(String),
    /// Never yields again (simulates a slow model).
    Hang,
}

impl MockChunk {
    pub fn text(s: impl Into<String>) -> Self {
        MockChunk::Text(s.into())
    }
}

/// Decrements the open-stream counter when the stream is dropped.
struct StreamGuard(Arc<AtomicUsize>);

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A mock inference server.
///
/// Scripts are popped from a FIFO queue, one per generation. When the queue
/// is empty a single "mock response" fragment is streamed.
pub struct MockInference {
    installed: Vec<String>,
    running: Mutex<HashSet<String>>,
    launch_loads: bool,
    launch_fails: bool,
    list_fails: bool,
    open_fails: bool,
    scripts: Mutex<VecDeque<Vec<MockChunk>>>,
    prompts: Mutex<Vec<GenerateRequest>>,
    launch_calls: AtomicUsize,
    generate_calls: AtomicUsize,
    open_streams: Arc<AtomicUsize>,
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInference {
    /// No models loaded; a launch request loads the model.
    pub fn new() -> Self {
        Self {
            installed: Vec::new(),
            running: Mutex::new(HashSet::new()),
            launch_loads: true,
            launch_fails: false,
            list_fails: false,
            open_fails: false,
            scripts: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            launch_calls: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            open_streams: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Marks `models` as already loaded.
    pub fn with_running(self, models: &[&str]) -> Self {
        self.running
            .lock()
            .unwrap()
            .extend(models.iter().map(|m| m.to_string()));
        self
    }

    /// Sets the installed models reported by `list_models`.
    pub fn with_installed(mut self, models: &[&str]) -> Self {
        self.installed = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Launch requests succeed but the model never shows up as loaded.
    pub fn never_loads(mut self) -> Self {
        self.launch_loads = false;
        self
    }

    /// Launch requests fail with a transport error.
    pub fn failing_launch(mut self) -> Self {
        self.launch_fails = true;
        self
    }

    /// `list_models` fails with a transport error.
    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// `generate_stream` fails before any fragment with a transport error.
    pub fn failing_generation(mut self) -> Self {
        self.open_fails = true;
        self
    }

    /// Queues the fragments for the next generation.
    pub fn with_script(self, chunks: Vec<MockChunk>) -> Self {
        self.push_script(chunks);
        self
    }

    /// Queues plain text fragments for the next generation.
    pub fn with_fragments(self, fragments: &[&str]) -> Self {
        self.with_script(fragments.iter().map(|f| MockChunk::text(*f)).collect())
    }

    pub fn push_script(&self, chunks: Vec<MockChunk>) {
        self.scripts.lock().unwrap().push_back(chunks);
    }

    pub fn launch_calls(&self) -> usize {
        self.launch_calls.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Generation streams not yet dropped.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    /// Every generation request received, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.prompts.lock().unwrap().clone()
    }

    /// The prompt of the most recent generation.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().map(|r| r.prompt.clone())
    }
}

fn transport(message: &str) -> HaskoError {
    HaskoError::Provider {
        message: message.to_string(),
        source: None,
    }
}

#[async_trait]
impl InferenceProvider for MockInference {
    async fn list_models(&self) -> Result<Vec<String>, HaskoError> {
        if self.list_fails {
            return Err(transport("mock list failure"));
        }
        Ok(self.installed.clone())
    }

    async fn running_models(&self) -> Result<Vec<String>, HaskoError> {
        let mut running: Vec<String> = self.running.lock().unwrap().iter().cloned().collect();
        running.sort();
        Ok(running)
    }

    async fn launch(&self, model: &str) -> Result<(), HaskoError> {
        self.launch_calls.fetch_add(1, Ordering::SeqCst);
        if self.launch_fails {
            return Err(transport("mock launch failure"));
        }
        if self.launch_loads {
            self.running.lock().unwrap().insert(model.to_string());
        }
        Ok(())
    }

    async fn generate_stream(&self, request: GenerateRequest) -> Result<TextStream, HaskoError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request);
        if self.open_fails {
            return Err(transport("mock generation failure"));
        }

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| vec![MockChunk::text("mock response")]);

        let mut items = Vec::new();
        let mut hang = false;
        for chunk in script {
            match chunk {
                MockChunk::Text(text) => items.push(Ok(text)),
                MockChunk::TransportError(message) => {
                    items.push(Err(transport(&message)));
                    break;
                }
                MockChunk::InternalError(message) => {
                    items.push(Err(HaskoError::Internal(message)));
                    break;
                }
                MockChunk::Hang => {
                    hang = true;
                    break;
                }
            }
        }

        self.open_streams.fetch_add(1, Ordering::SeqCst);
        let guard = StreamGuard(self.open_streams.clone());

        let tail: BoxStream<'static, Result<String, HaskoError>> = if hang {
            stream::pending().boxed()
        } else {
            stream::empty().boxed()
        };
        let stream = stream::iter(items).chain(tail).map(move |item| {
            let _held = &guard;
            item
        });
        Ok(Box::pin(stream))
    }
}
