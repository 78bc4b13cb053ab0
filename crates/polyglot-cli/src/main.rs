//! Polyglot CLI — entry point.
//!
//! # Commands
//!
//! - `polyglot translate [TEXT] [-l LANG] [-m MODEL]` — translate text (stdin if omitted)
//! - `polyglot models` — merged model catalog of every vendor with a token
//! - `polyglot status` — configuration and credential status
//! - `polyglot init` — write a starter config

mod helpers;
mod init;
mod models_cmd;
mod status;
mod translate_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Polyglot — translate text through any configured LLM provider
#[derive(Parser)]
#[command(name = "polyglot", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.polyglot/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate TEXT (or stdin) into the target language
    Translate {
        /// Text to translate. Read from stdin when omitted.
        text: Option<String>,

        /// Target language (default: languages.current)
        #[arg(short, long)]
        lang: Option<String>,

        /// Configured model name (default: models.current)
        #[arg(short, long)]
        model: Option<String>,

        /// Wait for the full translation instead of streaming
        #[arg(long, default_value_t = false)]
        no_stream: bool,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// List models offered by every vendor with a token
    Models {
        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and credential status
    Status,

    /// Create a starter configuration file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path: Option<PathBuf> = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Translate {
            text,
            lang,
            model,
            no_stream,
            logs,
        } => {
            init_logging(logs);
            let args = translate_cmd::TranslateArgs {
                text,
                lang,
                model,
                stream: !no_stream,
            };
            translate_cmd::run(args, config_path.as_deref()).await
        }
        Commands::Models { logs } => {
            init_logging(logs);
            models_cmd::run(config_path.as_deref()).await
        }
        Commands::Status => {
            init_logging(false);
            status::run(config_path.as_deref())
        }
        Commands::Init => {
            init_logging(false);
            init::run(config_path.as_deref())
        }
    }
}

/// Logs go to stderr so stdout carries only the translation.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("polyglot=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
