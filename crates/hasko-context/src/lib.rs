// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly for the Hasko relay.
//!
//! [`Persona`] holds the assistant's name and instructions; [`PromptBuilder`]
//! renders them with remembered facts, optional web content and the chat
//! history into the single text prompt the inference server expects.

pub mod persona;
pub mod prompt;

pub use persona::Persona;
pub use prompt::{PromptBuilder, readable_key};
