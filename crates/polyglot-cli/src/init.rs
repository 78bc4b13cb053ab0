//! `polyglot init` — write a starter configuration.
//!
//! Existing files are left untouched.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use polyglot_core::config::{save_config, Config};
use polyglot_core::ModelConfig;

use crate::helpers::{config_path_or_default, ok_mark, print_title};

pub fn run(config_path: Option<&Path>) -> Result<()> {
    let path = config_path_or_default(config_path);
    print_title("Polyglot — Setup");

    if path.exists() {
        println!("  {} config already exists at {}", ok_mark(), path.display());
    } else {
        save_config(&starter_config(), Some(&path))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("  {} created config at {}", ok_mark(), path.display());
    }

    println!();
    println!(
        "{}",
        "  Set OPENAI_API_KEY (or edit the models list), then run `polyglot translate`.".green()
    );
    println!();
    Ok(())
}

/// Defaults plus a few example models; tokens come from the environment.
fn starter_config() -> Config {
    let mut config = Config::default();
    config.models.available = vec![
        ModelConfig {
            name: "GPT-4o mini".to_string(),
            access_token_env: Some("OPENAI_API_KEY".to_string()),
            ..ModelConfig::new("openai", "gpt-4o-mini").with_streaming(true)
        },
        ModelConfig {
            name: "Claude 3.5 Haiku".to_string(),
            access_token_env: Some("ANTHROPIC_API_KEY".to_string()),
            ..ModelConfig::new("anthropic", "claude-3-5-haiku-latest")
        },
        ModelConfig {
            name: "Local Ollama".to_string(),
            ..ModelConfig::new("custom", "llama3.1")
                .with_endpoint("http://localhost:11434/v1")
                .with_streaming(true)
        },
    ];
    config.models.current = Some("GPT-4o mini".to_string());
    config
}
