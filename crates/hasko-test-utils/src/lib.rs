// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hasko integration tests.
//!
//! Provides mock upstreams and test harness infrastructure for fast,
//! deterministic tests without an Ollama server or network access.
//!
//! # Components
//!
//! - [`MockInference`] - scripted inference server with call counters
//! - [`MockSearch`] - fixed-outcome web search provider
//! - [`TestHarness`] - real conversation handler over the mocks and a temp memory file

pub mod harness;
pub mod mock_inference;
pub mod mock_search;

pub use harness::{TEST_MODEL, TestHarness, TestHarnessBuilder};
pub use mock_inference::{MockChunk, MockInference};
pub use mock_search::MockSearch;
