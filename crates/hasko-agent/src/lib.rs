// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation handling for the Hasko relay.
//!
//! Ties the memory store, intent classifier, web enrichment and prompt
//! builder together behind [`ConversationHandler::handle`], gated by the
//! [`ModelLauncher`] readiness check.

pub mod handler;
pub mod launcher;
pub mod replies;
pub mod shutdown;

pub use handler::{ConversationHandler, Reply, SendMessage};
pub use launcher::ModelLauncher;
pub use shutdown::install_signal_handler;
