// SPDX-FileCopyrightText: 2026 Hasko Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hasko - a local assistant relay with memory and web search.
//!
//! This is the binary entry point.

mod doctor;
mod models;
mod serve;

use clap::{Parser, Subcommand};
use tracing::error;

/// Hasko - a local assistant relay with memory and web search.
#[derive(Parser, Debug)]
#[command(name = "hasko", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP relay (the default).
    Serve,
    /// Print the models installed on the Ollama server.
    Models,
    /// Check configuration, Ollama, the memory file and search credentials.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match hasko_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hasko_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Models => models::run_models(&config).await,
        Commands::Doctor { plain } => doctor::run_doctor(&config, plain).await,
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Filter used when `RUST_LOG` is unset; `hasko` prefixes every crate target.
fn default_directives(log_level: &str) -> String {
    format!("hasko={log_level},tower_http={log_level},warn")
}

/// Initializes the tracing subscriber on stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::parse_from(["hasko"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn doctor_accepts_plain_flag() {
        let cli = Cli::parse_from(["hasko", "doctor", "--plain"]);
        assert!(matches!(cli.command, Some(Commands::Doctor { plain: true })));
    }

    #[test]
    fn default_directives_cover_all_crates() {
        assert_eq!(default_directives("debug"), "hasko=debug,tower_http=debug,warn");
    }
}
