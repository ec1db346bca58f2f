// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persona: the assistant's name and its standing instructions.

use hasko_config::model::AgentConfig;
use tracing::{info, warn};

/// Name and instruction block placed at the top of every prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    name: String,
    instructions: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
        }
    }

    /// Loads the persona following config priority.
    ///
    /// # Priority
    /// 1. `config.system_prompt_file` -- reads from disk
    /// 2. `config.system_prompt` -- inline string
    /// 3. Built-in instructions naming `config.name`
    pub async fn load(config: &AgentConfig) -> Self {
        if let Some(ref file_path) = config.system_prompt_file {
            match tokio::fs::read_to_string(file_path).await {
                Ok(content) if !content.trim().is_empty() => {
                    info!(path = file_path.as_str(), "loaded persona from file");
                    return Self::new(&config.name, content.trim());
                }
                Ok(_) => {
                    warn!(path = file_path.as_str(), "persona file is empty, falling back");
                }
                Err(e) => {
                    warn!(
                        path = file_path.as_str(),
                        error = %e,
                        "failed to read persona file, falling back"
                    );
                }
            }
        }

        if let Some(ref prompt) = config.system_prompt
            && !prompt.trim().is_empty()
        {
            return Self::new(&config.name, prompt.trim());
        }

        Self::default_for(&config.name)
    }

    /// The built-in persona for `name`.
    pub fn default_for(name: &str) -> Self {
        Self::new(
            name,
            format!(
                "You are {name}, a friendly and intelligent assistant. \
                 Provide clear and concise answers. Only include code snippets when the user explicitly requests them. \
                 When providing code, present it within triple backticks with the appropriate language specified."
            ),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_persona_names_agent() {
        let persona = Persona::load(&AgentConfig::default()).await;
        assert_eq!(persona.name(), "Hasko");
        assert!(persona.instructions().starts_with("You are Hasko, a friendly"));
    }

    #[tokio::test]
    async fn inline_prompt_overrides_default() {
        let config = AgentConfig {
            system_prompt: Some("  Be terse.  ".into()),
            ..Default::default()
        };
        assert_eq!(Persona::load(&config).await.instructions(), "Be terse.");
    }

    #[tokio::test]
    async fn file_prompt_wins_over_inline() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("persona.md");
        std::fs::write(&file_path, "From file.\n").unwrap();

        let config = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some(file_path.to_string_lossy().into_owned()),
            ..Default::default()
        };
        assert_eq!(Persona::load(&config).await.instructions(), "From file.");
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_inline() {
        let config = AgentConfig {
            system_prompt: Some("Inline.".into()),
            system_prompt_file: Some("/nonexistent/persona.md".into()),
            ..Default::default()
        };
        assert_eq!(Persona::load(&config).await.instructions(), "Inline.");
    }
}
