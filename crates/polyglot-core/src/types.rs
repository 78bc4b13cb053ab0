//! Core types for Polyglot — chat messages, provider identifiers, model
//! configuration, and model catalog entries.
//!
//! These are plain value objects: the UI/settings layer creates them, the
//! provider layer only reads them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Role of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A chat message in the OpenAI wire format (`{"role": ..., "content": ...}`).
///
/// A translation call carries one optional `system` message followed by
/// exactly one `user` message. No multi-turn history is modeled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Message {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Message {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────
// ProviderKind
// ─────────────────────────────────────────────

/// Every vendor tag a `ModelConfig` may carry.
///
/// Cerebras and Nebius are OpenAI-compatible backends served by the custom
/// provider with their own default endpoints and key variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Google,
    OpenRouter,
    Custom,
    Cerebras,
    Nebius,
}

impl ProviderKind {
    pub const ALL: &'static [ProviderKind] = &[
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Google,
        ProviderKind::OpenRouter,
        ProviderKind::Custom,
        ProviderKind::Cerebras,
        ProviderKind::Nebius,
    ];

    /// Lowercase identifier used in config files.
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Google => "google",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Custom => "custom",
            ProviderKind::Cerebras => "cerebras",
            ProviderKind::Nebius => "nebius",
        }
    }

    /// Human-readable name for logs and error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Google => "Google",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::Custom => "Custom",
            ProviderKind::Cerebras => "Cerebras",
            ProviderKind::Nebius => "Nebius",
        }
    }

    /// Environment variable consulted when the config names none.
    ///
    /// Generic custom endpoints have no conventional variable.
    pub fn env_key(self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Google => Some("GOOGLE_API_KEY"),
            ProviderKind::OpenRouter => Some("OPENROUTER_API_KEY"),
            ProviderKind::Cerebras => Some("CEREBRAS_API_KEY"),
            ProviderKind::Nebius => Some("NEBIUS_API_KEY"),
            ProviderKind::Custom => None,
        }
    }

    /// Endpoint used when the config leaves `api_endpoint` empty.
    pub fn default_endpoint(self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
            ProviderKind::Anthropic => Some("https://api.anthropic.com"),
            ProviderKind::Google => Some("https://generativelanguage.googleapis.com/v1beta"),
            ProviderKind::OpenRouter => Some("https://openrouter.ai/api/v1/chat/completions"),
            ProviderKind::Cerebras => Some("https://api.cerebras.ai/v1"),
            ProviderKind::Nebius => Some("https://api.studio.nebius.ai/v1"),
            ProviderKind::Custom => None,
        }
    }

    /// Whether an empty access token is acceptable (self-hosted endpoints).
    pub fn allows_anonymous(self) -> bool {
        matches!(self, ProviderKind::Custom)
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    /// Case-insensitive parse. `"gemini"` is accepted as an alias for Google.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "google" | "gemini" => Ok(ProviderKind::Google),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "custom" => Ok(ProviderKind::Custom),
            "cerebras" => Ok(ProviderKind::Cerebras),
            "nebius" => Ok(ProviderKind::Nebius),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ─────────────────────────────────────────────
// ModelConfig
// ─────────────────────────────────────────────

/// One usable (provider, model) pair as stored in the settings file.
///
/// The credential is either a literal `access_token` or the *name* of an
/// environment variable in `access_token_env`; see
/// [`crate::credentials::resolve_token`] for the precedence rule.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// User-facing label (e.g. `"GPT-4o mini"`).
    pub name: String,
    /// Vendor tag, parsed case-insensitively into a [`ProviderKind`].
    pub provider: String,
    /// Vendor-specific model identifier (e.g. `"gpt-4o-mini"`).
    pub model_name: String,
    /// Base URL. Empty means "use the vendor default".
    pub api_endpoint: String,
    /// Literal secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Name of an environment variable holding the secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_env: Option<String>,
    /// Whether to request incremental delivery.
    pub streaming: bool,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("provider", &self.provider)
            .field("model_name", &self.model_name)
            .field("api_endpoint", &self.api_endpoint)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("access_token_env", &self.access_token_env)
            .field("streaming", &self.streaming)
            .finish()
    }
}

impl ModelConfig {
    /// Convenience constructor used by the catalog fan-out and tests.
    pub fn new(provider: impl Into<String>, model_name: impl Into<String>) -> Self {
        ModelConfig {
            provider: provider.into(),
            model_name: model_name.into(),
            ..Default::default()
        }
    }

    /// Set a literal access token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    /// Enable or disable streaming.
    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    /// Parse the vendor tag.
    pub fn kind(&self) -> Result<ProviderKind, ConfigError> {
        self.provider.parse()
    }

    /// The configured endpoint, or the vendor default when empty.
    pub fn effective_endpoint(&self, kind: ProviderKind) -> Option<String> {
        let configured = self.api_endpoint.trim();
        if configured.is_empty() {
            kind.default_endpoint().map(String::from)
        } else {
            Some(configured.to_string())
        }
    }

    /// Check required fields before any network call.
    pub fn validate(&self) -> Result<ProviderKind, ConfigError> {
        let kind = self.kind()?;
        if self.model_name.trim().is_empty() {
            return Err(ConfigError::MissingField {
                model: self.label().to_string(),
                field: "model_name",
            });
        }
        if self.effective_endpoint(kind).is_none() {
            return Err(ConfigError::MissingField {
                model: self.label().to_string(),
                field: "api_endpoint",
            });
        }
        Ok(kind)
    }

    /// Name for messages: the label if set, else the model id.
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.model_name
        } else {
            &self.name
        }
    }
}

// ─────────────────────────────────────────────
// Model catalog
// ─────────────────────────────────────────────

/// One entry of a provider's model catalog, used to populate pickers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderModelInfo {
    /// Display name, prefixed with the vendor (e.g. `"OpenRouter - Llama 3"`).
    pub name: String,
    /// Identifier to put into `ModelConfig::model_name`.
    pub model_name: String,
    pub description: String,
}

impl ProviderModelInfo {
    pub fn new(
        name: impl Into<String>,
        model_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        ProviderModelInfo {
            name: name.into(),
            model_name: model_name.into(),
            description: description.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
