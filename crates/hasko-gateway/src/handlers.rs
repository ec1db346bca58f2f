// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handles POST /send-message, GET /models and GET /.

use std::convert::Infallible;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use hasko_agent::replies::UNEXPECTED_ERROR;
use hasko_agent::{Reply, SendMessage};
use hasko_core::HaskoError;
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error};

use crate::server::GatewayState;

pub const ROOT_MESSAGE: &str = "Hasko backend is running.";
pub const MODELS_FAILED: &str = "Failed to retrieve models from Ollama API.";
pub const MODELS_UNEXPECTED: &str = "An unexpected error occurred while retrieving models.";

/// One prior turn as the client renders it.
///
/// Clients send `{role, content}` or `{isUser, text}`, sometimes mixed, so
/// every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryItem {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "isUser")]
    pub is_user: Option<bool>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl HistoryItem {
    /// Message body, whichever field carried it.
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().or(self.text.as_deref())
    }
}

/// History never fails a request: items that do not fit [`HistoryItem`]
/// become empty ones, and a non-array value becomes an empty history.
fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<HistoryItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

/// Request body for POST /send-message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
    /// Empty selects the configured default model.
    #[serde(default)]
    pub model: String,
    /// Logged only; the memory file is authoritative.
    #[serde(default, deserialize_with = "lenient_history")]
    pub history: Vec<HistoryItem>,
    pub chat_id: i64,
}

/// Response body for GET /models.
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Error body, `{"detail": ...}`.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDetail {
            detail: detail.into(),
        }),
    )
        .into_response()
}

fn text_response(body: Body) -> Response {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}

/// GET /
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": ROOT_MESSAGE }))
}

/// GET /models
///
/// Lists the models installed on the inference server.
pub async fn list_models(State(state): State<GatewayState>) -> Response {
    match state.inference.list_models().await {
        Ok(models) => Json(ModelsResponse { models }).into_response(),
        Err(e) if e.is_transport() => {
            error!(error = %e, "failed to retrieve models");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MODELS_FAILED)
        }
        Err(e) => {
            error!(error = %e, "unexpected error retrieving models");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, MODELS_UNEXPECTED)
        }
    }
}

/// POST /send-message
///
/// Streams the reply as raw `text/plain` chunks. A model that cannot be
/// started is the only failure reported as an HTTP error.
pub async fn send_message(
    State(state): State<GatewayState>,
    Json(body): Json<SendMessageRequest>,
) -> Response {
    debug!(
        chat_id = body.chat_id,
        history = body.history.len(),
        with_body = body.history.iter().filter(|h| h.body().is_some()).count(),
        "client history received"
    );

    let msg = SendMessage {
        chat_id: body.chat_id.to_string(),
        content: body.content,
        model: body.model,
    };

    match state.handler.handle(msg).await {
        Ok(Reply::Text(text)) => text_response(Body::from(text)),
        Ok(Reply::Stream(rx)) => {
            let chunks = ReceiverStream::new(rx).map(Ok::<_, Infallible>);
            text_response(Body::from_stream(chunks))
        }
        Err(e @ HaskoError::ModelUnavailable { .. }) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!(error = %e, "request failed");
            text_response(Body::from(UNEXPECTED_ERROR))
        }
    }
}
