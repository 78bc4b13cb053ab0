//! `polyglot status` — show configuration and credential status.
//!
//! Tokens are only ever reported as present or missing.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use polyglot_core::config::{load_config, HttpConfig};
use polyglot_core::{resolve_token, ModelConfig};

use crate::helpers::{config_path_or_default, missing_mark, ok_mark, print_title};

/// Run the status command.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let path = config_path_or_default(config_path);

    print_title("Polyglot Status");

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        path.display(),
        if path.exists() {
            ok_mark()
        } else {
            "(not found)".red().to_string()
        }
    );

    let current = config
        .models
        .current_model()
        .map(|m| format!("{} ({} / {})", m.label(), m.provider, m.model_name))
        .unwrap_or_else(|| missing_mark("none configured"));
    println!("  {:<18} {}", "Model:".bold(), current);
    println!("  {:<18} {}", "Language:".bold(), config.languages.current);
    println!("  {:<18} {}", "HTTP:".bold(), describe_http(&config.http).dimmed());

    println!();
    println!("  {}", "Models:".bold());
    if config.models.available.is_empty() {
        println!("    {}", missing_mark("none (run `polyglot init`)"));
    }
    for model in &config.models.available {
        println!(
            "    {:<24} {:<12} {}",
            model.label(),
            model.provider,
            credential_status(model)
        );
    }
    println!();

    Ok(())
}

fn describe_http(http: &HttpConfig) -> String {
    let timeout = match http.timeout_secs {
        Some(secs) => format!("timeout {secs}s"),
        None => "no timeout".to_string(),
    };
    format!(
        "{timeout} | catalog timeout {}s | debug {}",
        http.catalog_timeout().as_secs(),
        if http.debug { "on" } else { "off" }
    )
}

fn credential_status(model: &ModelConfig) -> String {
    let kind = match model.kind() {
        Ok(kind) => kind,
        Err(e) => return e.to_string().red().to_string(),
    };
    if !resolve_token(model).is_empty() {
        format!("{} (key set)", ok_mark())
    } else if kind.allows_anonymous() {
        missing_mark("no key (anonymous)")
    } else {
        missing_mark(&format!("no key (set {})", kind.env_key().unwrap_or("accessToken")))
    }
}
