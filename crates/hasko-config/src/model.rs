// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Hasko relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level Hasko configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HaskoConfig {
    /// Persona and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Local Ollama inference server settings.
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// Web search enrichment settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Persistent memory file settings.
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Persona and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Persona name, used in prompts and when rendering history.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline persona instructions. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a text file containing the persona instructions.
    #[serde(default)]
    pub system_prompt_file: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
        }
    }
}

fn default_agent_name() -> String {
    "Hasko".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Browser origins allowed by CORS. Accepts a list or a comma-separated string.
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "list_or_comma_separated"
    )]
    pub allowed_origins: Vec<String>,

    /// Capacity of the bounded channel between the inference stream and the response body.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            stream_buffer: default_stream_buffer(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}

fn default_stream_buffer() -> usize {
    32
}

/// Ollama inference server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaConfig {
    /// API base URL, including the `/api` path segment.
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model used when a request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Seconds to wait after a launch request before re-checking the model.
    #[serde(default = "default_launch_settle_secs")]
    pub launch_settle_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            default_model: default_model(),
            launch_settle_secs: default_launch_settle_secs(),
        }
    }
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434/api".to_string()
}

fn default_model() -> String {
    "Llama3.2:3B".to_string()
}

fn default_launch_settle_secs() -> u64 {
    5
}

/// Web search enrichment configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Google Custom Search API key. `None` disables live search.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Google Programmable Search engine id (`cx`).
    #[serde(default)]
    pub engine_id: Option<String>,

    /// Search endpoint URL.
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Maximum characters of concatenated snippets passed to summarization.
    #[serde(default = "default_max_snippet_chars")]
    pub max_snippet_chars: usize,

    /// Request timeout for the search provider, in seconds.
    #[serde(default = "default_search_timeout_secs")]
    pub timeout_secs: u64,

    /// Feed search summaries into the generation prompt instead of replying directly.
    #[serde(default)]
    pub augment_generation: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            base_url: default_search_base_url(),
            max_snippet_chars: default_max_snippet_chars(),
            timeout_secs: default_search_timeout_secs(),
            augment_generation: false,
        }
    }
}

fn default_search_base_url() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_max_snippet_chars() -> usize {
    1000
}

fn default_search_timeout_secs() -> u64 {
    5
}

/// What to do with a memory file that cannot be used (unreadable or oversize).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptionPolicy {
    /// Start from an empty document; the bad file is overwritten on next save.
    #[default]
    Reset,
    /// Move the bad file aside with a timestamp suffix, then start empty.
    Backup,
}

/// Persistent memory file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Path of the JSON memory document.
    #[serde(default = "default_memory_file_path")]
    pub file_path: String,

    /// Size ceiling in bytes for the serialized document.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Recovery behavior for unreadable or oversize files.
    #[serde(default)]
    pub corruption_policy: CorruptionPolicy,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            file_path: default_memory_file_path(),
            max_file_size: default_max_file_size(),
            corruption_policy: CorruptionPolicy::default(),
        }
    }
}

fn default_memory_file_path() -> String {
    "memory.json".to_string()
}

fn default_max_file_size() -> u64 {
    4 * 1024 * 1024 * 1024
}

/// Accepts either a TOML/JSON list or a single comma-separated string.
fn list_or_comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrString {
        List(Vec<String>),
        String(String),
    }

    Ok(match ListOrString::deserialize(deserializer)? {
        ListOrString::List(items) => items,
        ListOrString::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = HaskoConfig::default();
        assert_eq!(config.agent.name, "Hasko");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.allowed_origins, vec!["http://localhost:5173"]);
        assert_eq!(config.ollama.base_url, "http://localhost:11434/api");
        assert_eq!(config.ollama.default_model, "Llama3.2:3B");
        assert_eq!(config.memory.file_path, "memory.json");
        assert_eq!(config.memory.max_file_size, 4_294_967_296);
        assert_eq!(config.memory.corruption_policy, CorruptionPolicy::Reset);
        assert_eq!(config.search.max_snippet_chars, 1000);
        assert!(!config.search.augment_generation);
    }

    #[test]
    fn allowed_origins_accepts_comma_separated_string() {
        let toml_str = r#"
[server]
allowed_origins = "http://a.test, http://b.test,"
"#;
        let config: HaskoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.server.allowed_origins,
            vec!["http://a.test", "http://b.test"]
        );
    }

    #[test]
    fn allowed_origins_accepts_list() {
        let toml_str = r#"
[server]
allowed_origins = ["http://a.test"]
"#;
        let config: HaskoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.allowed_origins, vec!["http://a.test"]);
    }

    #[test]
    fn corruption_policy_parses_lowercase() {
        let toml_str = r#"
[memory]
corruption_policy = "backup"
"#;
        let config: HaskoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.memory.corruption_policy, CorruptionPolicy::Backup);
    }

    #[test]
    fn memory_section_denies_unknown_fields() {
        let toml_str = r#"
[memory]
file_pth = "x.json"
"#;
        assert!(toml::from_str::<HaskoConfig>(toml_str).is_err());
    }
}
