// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Hasko relay.
//!
//! Serves `POST /send-message` (streamed `text/plain` replies),
//! `GET /models` and a liveness route on `/`.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, build_router, cors_layer, start_server};
