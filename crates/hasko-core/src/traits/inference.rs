// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference provider trait for the local model server.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::HaskoError;
use crate::types::GenerateRequest;

/// A stream of decoded text fragments in arrival order.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, HaskoError>> + Send>>;

/// Adapter for a locally hosted inference server.
#[async_trait]
pub trait InferenceProvider: Send + Sync + 'static {
    /// Lists the model names installed on the server.
    async fn list_models(&self) -> Result<Vec<String>, HaskoError>;

    /// Lists the model names currently loaded and active.
    async fn running_models(&self) -> Result<Vec<String>, HaskoError>;

    /// Asks the server to load a model. Returns once the request is accepted.
    async fn launch(&self, model: &str) -> Result<(), HaskoError>;

    /// Starts a streamed generation and returns its text fragments.
    ///
    /// Dropping the returned stream closes the upstream connection.
    async fn generate_stream(&self, request: GenerateRequest) -> Result<TextStream, HaskoError>;
}
