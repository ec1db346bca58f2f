// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks constraints serde attributes cannot express, such as URL schemes,
//! non-empty paths, and non-zero limits.

use crate::diagnostic::ConfigError;
use crate::model::HaskoConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HaskoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.agent.name.trim().is_empty() {
        fail("agent.name must not be empty".to_string());
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.server.stream_buffer == 0 {
        fail("server.stream_buffer must be at least 1".to_string());
    }

    let base_url = config.ollama.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        fail(format!(
            "ollama.base_url `{base_url}` must start with http:// or https://"
        ));
    }

    if config.ollama.default_model.trim().is_empty() {
        fail("ollama.default_model must not be empty".to_string());
    }

    if config.search.max_snippet_chars == 0 {
        fail("search.max_snippet_chars must be at least 1".to_string());
    }

    if config.search.timeout_secs == 0 {
        fail("search.timeout_secs must be at least 1".to_string());
    }

    if config.memory.file_path.trim().is_empty() {
        fail("memory.file_path must not be empty".to_string());
    }

    if config.memory.max_file_size == 0 {
        fail("memory.max_file_size must be greater than 0".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
