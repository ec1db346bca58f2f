// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hasko doctor` command implementation.
//!
//! Runs diagnostic checks against the configured environment: config
//! validity, Ollama reachability, the default model, the memory file and
//! search credentials.

use std::io::IsTerminal;
use std::path::Path;
use std::time::{Duration, Instant};

use hasko_agent::launcher::same_model;
use hasko_config::HaskoConfig;
use hasko_config::model::{AgentConfig, MemoryConfig, OllamaConfig, SearchConfig};
use hasko_core::{HaskoError, InferenceProvider};
use hasko_memory::MemoryDocument;
use hasko_ollama::OllamaClient;
use hasko_search::GoogleSearchClient;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `hasko doctor` command.
///
/// With `plain`, disables colored output.
pub async fn run_doctor(config: &HaskoConfig, plain: bool) -> Result<(), HaskoError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let mut results = vec![check_config()];
    let (ollama, installed) = check_ollama(&config.ollama).await;
    results.push(ollama);
    results.push(check_default_model(
        &config.ollama.default_model,
        installed.as_deref(),
    ));
    results.push(check_memory_file(&config.memory).await);
    if let Some(persona) = check_persona(&config.agent).await {
        results.push(persona);
    }
    results.push(check_search(&config.search));

    println!();
    println!("  hasko doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", render_line(result, use_color));
    }

    println!();
    match issues {
        0 => println!("  All checks passed."),
        1 => println!("  1 issue found."),
        n => println!("  {n} issues found."),
    }
    println!();

    Ok(())
}

fn render_line(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if !use_color {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        return format!(
            "    {tag} {:<16} {} ({duration_ms}ms)",
            result.name, result.message
        );
    }

    use colored::Colorize;
    let (symbol, message) = match result.status {
        CheckStatus::Pass => ("✓".green(), result.message.normal()),
        CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
        CheckStatus::Fail => ("✗".red(), result.message.red()),
    };
    format!(
        "    {symbol} {:<16} {message} ({duration_ms}ms)",
        result.name
    )
}

/// Check configuration loads without errors.
fn check_config() -> CheckResult {
    let start = Instant::now();
    match hasko_config::load_and_validate() {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the Ollama API answers a model listing.
async fn check_ollama(config: &OllamaConfig) -> (CheckResult, Option<Vec<String>>) {
    let start = Instant::now();
    let client = match OllamaClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            return (
                CheckResult::new("Ollama", CheckStatus::Fail, format!("client error: {e}"), start),
                None,
            );
        }
    };

    let listing = tokio::time::timeout(Duration::from_secs(5), client.list_models()).await;
    match listing {
        Ok(Ok(models)) => (
            CheckResult::new(
                "Ollama",
                CheckStatus::Pass,
                format!("reachable, {} model(s) installed", models.len()),
                start,
            ),
            Some(models),
        ),
        Ok(Err(e)) => (
            CheckResult::new("Ollama", CheckStatus::Fail, e.to_string(), start),
            None,
        ),
        Err(_) => (
            CheckResult::new(
                "Ollama",
                CheckStatus::Fail,
                format!("timeout (5s) at {}", config.base_url),
                start,
            ),
            None,
        ),
    }
}

/// Check the default model is installed.
fn check_default_model(default_model: &str, installed: Option<&[String]>) -> CheckResult {
    let start = Instant::now();
    let Some(installed) = installed else {
        return CheckResult::new(
            "Default model",
            CheckStatus::Warn,
            "skipped (Ollama unreachable)",
            start,
        );
    };

    if installed.iter().any(|m| same_model(default_model, m)) {
        CheckResult::new("Default model", CheckStatus::Pass, default_model, start)
    } else {
        CheckResult::new(
            "Default model",
            CheckStatus::Warn,
            format!("{default_model} is not installed (run `ollama pull {default_model}`)"),
            start,
        )
    }
}

/// Check the memory file is absent, or present, within the ceiling and parseable.
async fn check_memory_file(config: &MemoryConfig) -> CheckResult {
    let start = Instant::now();
    let path = Path::new(&config.file_path);

    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return CheckResult::new(
                "Memory file",
                CheckStatus::Warn,
                format!("not found: {} (will be created on first write)", config.file_path),
                start,
            );
        }
        Err(e) => {
            return CheckResult::new("Memory file", CheckStatus::Fail, e.to_string(), start);
        }
    };

    if metadata.len() > config.max_file_size {
        return CheckResult::new(
            "Memory file",
            CheckStatus::Warn,
            format!(
                "{} bytes exceeds the {} byte ceiling (will be recovered on load)",
                metadata.len(),
                config.max_file_size
            ),
            start,
        );
    }

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return CheckResult::new("Memory file", CheckStatus::Fail, e.to_string(), start);
        }
    };
    match serde_json::from_slice::<MemoryDocument>(&bytes) {
        Ok(doc) => CheckResult::new(
            "Memory file",
            CheckStatus::Pass,
            format!("{} chat(s), {} bytes", doc.chats.len(), bytes.len()),
            start,
        ),
        Err(e) => CheckResult::new(
            "Memory file",
            CheckStatus::Fail,
            format!("unreadable ({e}), will be recovered on load"),
            start,
        ),
    }
}

/// Check a configured persona file is readable. `None` when none is configured.
async fn check_persona(config: &AgentConfig) -> Option<CheckResult> {
    let file = config.system_prompt_file.as_deref()?;
    let start = Instant::now();
    Some(match tokio::fs::read_to_string(file).await {
        Ok(_) => CheckResult::new("Persona file", CheckStatus::Pass, file, start),
        Err(e) => CheckResult::new(
            "Persona file",
            CheckStatus::Warn,
            format!("{file}: {e} (falling back to the built-in persona)"),
            start,
        ),
    })
}

/// Check search credentials are present.
fn check_search(config: &SearchConfig) -> CheckResult {
    let start = Instant::now();
    match GoogleSearchClient::new(config) {
        Ok(client) if client.is_configured() => {
            CheckResult::new("Web search", CheckStatus::Pass, "credentials configured", start)
        }
        Ok(_) => CheckResult::new(
            "Web search",
            CheckStatus::Warn,
            "no API key or engine id (search requests will apologize)",
            start,
        ),
        Err(e) => CheckResult::new("Web search", CheckStatus::Fail, e.to_string(), start),
    }
}
