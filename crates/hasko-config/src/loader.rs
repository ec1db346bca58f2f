// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./hasko.toml` > `~/.config/hasko/hasko.toml` > `/etc/hasko/hasko.toml`
//! with environment variable overrides via the legacy backend names and the `HASKO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::HaskoConfig;

/// Unprefixed environment variable names accepted for compatibility, with their config keys.
pub const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("OLLAMA_API_BASE_URL", "ollama.base_url"),
    ("DEFAULT_MODEL", "ollama.default_model"),
    ("GOOGLE_CUSTOM_SEARCH_API_KEY", "search.api_key"),
    ("GOOGLE_CUSTOM_SEARCH_ENGINE_ID", "search.engine_id"),
    ("MEMORY_FILE", "memory.file_path"),
    ("ALLOWED_ORIGINS", "server.allowed_origins"),
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/hasko/hasko.toml` (system-wide)
/// 3. `~/.config/hasko/hasko.toml` (user XDG config)
/// 4. `./hasko.toml` (local directory)
/// 5. Legacy environment variables (`OLLAMA_API_BASE_URL`, `MEMORY_FILE`, ...)
/// 6. `HASKO_*` environment variables
pub fn load_config() -> Result<HaskoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<HaskoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HaskoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<HaskoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(HaskoConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(HaskoConfig::default()))
        .merge(Toml::file("/etc/hasko/hasko.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("hasko/hasko.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("hasko.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Provider for the unprefixed legacy variable names.
fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        // `key` arrives lowercased.
        let mapped = LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key.as_str()))
            .map(|(_, path)| path.to_string())
            .unwrap_or_else(|| key.as_str().to_string());
        mapped.into()
    })
}

/// Create the `HASKO_` environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` so underscore-containing key names
/// survive: `HASKO_OLLAMA_DEFAULT_MODEL` must map to `ollama.default_model`,
/// not `ollama.default.model`.
fn env_provider() -> Env {
    Env::prefixed("HASKO_").map(|key| {
        // Example: HASKO_MEMORY_FILE_PATH -> "memory_file_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("server_", "server.", 1)
            .replacen("ollama_", "ollama.", 1)
            .replacen("search_", "search.", 1)
            .replacen("memory_", "memory.", 1);
        mapped.into()
    })
}
