//! Access token resolution.
//!
//! Precedence, first non-empty value wins:
//! 1. The environment variable *named* by `access_token_env`.
//! 2. The vendor's conventional variable (e.g. `OPENAI_API_KEY`).
//! 3. The literal `access_token`.
//!
//! Nothing is cached: each provider construction re-reads the environment.
//! An unresolved token is returned as an empty string; callers decide whether
//! that is fatal.

use std::str::FromStr;

use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::types::{ModelConfig, ProviderKind};

/// Resolve the access token for `config` from the process environment.
pub fn resolve_token(config: &ModelConfig) -> String {
    resolve_token_with(config, |name| std::env::var(name).ok())
}

/// Resolve the access token using a custom variable lookup.
///
/// `lookup` receives a variable name and returns its value, if set.
pub fn resolve_token_with<F>(config: &ModelConfig, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| lookup(name).filter(|value| !value.is_empty());

    if let Some(env_name) = config.access_token_env.as_deref().filter(|n| !n.is_empty()) {
        if let Some(token) = read(env_name) {
            debug!(var = env_name, "access token: [PRESENT] (named variable)");
            return token;
        }
        warn!(var = env_name, "environment variable for access token is not set");
    }

    if let Some(env_name) = default_env_var(&config.provider) {
        if let Some(token) = read(env_name) {
            debug!(var = env_name, "access token: [PRESENT] (provider default)");
            return token;
        }
    }

    if let Some(token) = config.access_token.as_deref().filter(|t| !t.is_empty()) {
        debug!(provider = %config.provider, "access token: [PRESENT] (literal)");
        return token.to_string();
    }

    debug!(provider = %config.provider, "access token: [MISSING]");
    String::new()
}

/// Conventional environment variable for a provider tag, if any.
pub fn default_env_var(provider: &str) -> Option<&'static str> {
    ProviderKind::from_str(provider).ok().and_then(ProviderKind::env_key)
}

/// Fail when `kind` needs a credential and `token` is empty.
pub fn require_token(kind: ProviderKind, token: &str) -> Result<(), ConfigError> {
    if token.is_empty() && !kind.allows_anonymous() {
        return Err(ConfigError::MissingToken {
            provider: kind.display_name().to_string(),
            hint: kind.env_key().unwrap_or("accessToken").to_string(),
        });
    }
    Ok(())
}

/// `"[PRESENT]"` or `"[MISSING]"`. Tokens are only ever logged in this form.
pub fn token_status(token: &str) -> &'static str {
    if token.is_empty() {
        "[MISSING]"
    } else {
        "[PRESENT]"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
