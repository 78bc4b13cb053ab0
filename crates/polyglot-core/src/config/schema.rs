//! Configuration schema.
//!
//! Hierarchy: `Config` → `ModelsConfig`, `LanguagesConfig`, `HttpConfig`,
//! plus the translation system prompt.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ModelConfig;

/// Placeholder replaced by the target language in the system prompt.
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

/// System prompt used when none is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional translator. \
Translate the user's text into {language}. \
Preserve formatting and output only the translation.";

/// Default per-provider bound for model catalog queries.
pub const DEFAULT_CATALOG_TIMEOUT_S: u64 = 15;

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.polyglot/config.json` + env vars.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub models: ModelsConfig,
    pub languages: LanguagesConfig,
    /// Translation instructions; `{language}` is substituted per call.
    pub system_prompt: String,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelsConfig::default(),
            languages: LanguagesConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// The configured system prompt, or the default when blank.
    pub fn effective_system_prompt(&self) -> &str {
        if self.system_prompt.trim().is_empty() {
            DEFAULT_SYSTEM_PROMPT
        } else {
            &self.system_prompt
        }
    }
}

// ─────────────────────────────────────────────
// Models
// ─────────────────────────────────────────────

/// Configured models and the current selection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelsConfig {
    pub available: Vec<ModelConfig>,
    /// `name` of the selected entry in `available`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<String>,
}

impl ModelsConfig {
    /// Find a model by its label.
    pub fn get(&self, name: &str) -> Option<&ModelConfig> {
        self.available.iter().find(|m| m.name == name)
    }

    /// The selected model, falling back to the first configured one.
    pub fn current_model(&self) -> Option<&ModelConfig> {
        self.current
            .as_deref()
            .and_then(|name| self.get(name))
            .or_else(|| self.available.first())
    }
}

// ─────────────────────────────────────────────
// Languages
// ─────────────────────────────────────────────

/// Target languages offered to the user.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguagesConfig {
    pub available: Vec<String>,
    pub current: String,
}

impl Default for LanguagesConfig {
    fn default() -> Self {
        Self {
            available: vec![
                "English".to_string(),
                "Russian".to_string(),
                "Kazakh".to_string(),
            ],
            current: "English".to_string(),
        }
    }
}

// ─────────────────────────────────────────────
// HTTP
// ─────────────────────────────────────────────

/// Outbound HTTP behaviour shared by every provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HttpConfig {
    /// Whole-request timeout for translation calls. `None` means no timeout,
    /// which long streaming responses may need.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Per-provider bound on model catalog queries.
    pub catalog_timeout_secs: u64,
    /// Log requests/responses and include response bodies in error messages.
    pub debug: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            catalog_timeout_secs: DEFAULT_CATALOG_TIMEOUT_S,
            debug: false,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Never shorter than one second, even if the file says `0`.
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs.max(1))
    }
}
