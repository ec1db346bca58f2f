// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use hasko_agent::ConversationHandler;
use hasko_config::model::ServerConfig;
use hasko_core::{HaskoError, InferenceProvider};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Orchestrates `/send-message`.
    pub handler: Arc<ConversationHandler>,
    /// Answers `/models`.
    pub inference: Arc<dyn InferenceProvider>,
}

/// Builds the application router with CORS and request tracing.
pub fn build_router(state: GatewayState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/models", get(handlers::list_models))
        .route("/send-message", post(handlers::send_message))
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins.
///
/// Listed origins get credentials and mirrored methods and headers. A `*`
/// entry allows any origin, without credentials.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o.trim() == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Start the gateway HTTP server.
///
/// Binds to the configured host:port and serves until `cancel` fires,
/// then drains in-flight requests.
/// `host:port` for binding; IP literals go through [`SocketAddr`] so IPv6
/// hosts come out bracketed.
fn bind_addr(host: &str, port: u16) -> String {
    match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port).to_string(),
        Err(_) => format!("{host}:{port}"),
    }
}

pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), HaskoError> {
    let app = build_router(state, &config.allowed_origins);

    let addr = bind_addr(&config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HaskoError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    info!(addr = %addr, origins = ?config.allowed_origins, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .map_err(|e| HaskoError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}
