//! `polyglot models` — list what every vendor with a token offers.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use tracing::debug;

use polyglot_core::config::load_config;
use polyglot_core::{resolve_token, ModelConfig};
use polyglot_providers::get_all_available_models;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let tokens = gather_tokens(&config.models.available);
    debug!(vendors = tokens.len(), "tokens gathered from configured models");

    let models = get_all_available_models(&tokens, &config.http).await;

    crate::helpers::print_title("Available models");
    if models.is_empty() {
        println!(
            "  {}",
            "No models found. Configure an API key for OpenAI, Anthropic, Google or OpenRouter."
                .dimmed()
        );
        println!();
        return Ok(());
    }

    for model in &models {
        println!("  {:<48} {}", model.name.bold(), model.model_name.dimmed());
        if !model.description.is_empty() {
            println!("    {}", model.description);
        }
    }
    println!();
    println!("  {} models", models.len());
    println!();
    Ok(())
}

/// One token per vendor tag, taken from the first configured model of that
/// vendor that resolves one.
pub fn gather_tokens(models: &[ModelConfig]) -> HashMap<String, String> {
    let mut tokens = HashMap::new();
    for model in models {
        let Ok(kind) = model.kind() else {
            continue;
        };
        if tokens.contains_key(kind.as_str()) {
            continue;
        }
        let token = resolve_token(model);
        if !token.is_empty() {
            tokens.insert(kind.as_str().to_string(), token);
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_tokens_first_model_per_vendor_wins() {
        // Distinct variable names keep this independent of the real environment.
        let mut first = ModelConfig::new("Anthropic", "claude-3-haiku");
        first.access_token_env = Some("POLYGLOT_TEST_GATHER_A".to_string());
        let mut second = ModelConfig::new("anthropic", "claude-3-opus");
        second.access_token_env = Some("POLYGLOT_TEST_GATHER_B".to_string());
        std::env::set_var("POLYGLOT_TEST_GATHER_A", "tok-a");
        std::env::set_var("POLYGLOT_TEST_GATHER_B", "tok-b");

        let tokens = gather_tokens(&[first, second]);
        assert_eq!(tokens.get("anthropic").map(String::as_str), Some("tok-a"));

        std::env::remove_var("POLYGLOT_TEST_GATHER_A");
        std::env::remove_var("POLYGLOT_TEST_GATHER_B");
    }

    #[test]
    fn gather_tokens_skips_unknown_vendors() {
        let models = vec![ModelConfig::new("mystery", "m").with_token("t")];
        assert!(gather_tokens(&models).is_empty());
    }
}
