//! Provider factory and model-catalog fan-out.
//!
//! [`get_provider`] maps a [`ModelConfig`] to one [`Provider`] variant;
//! [`get_all_available_models`] queries every vendor that has a token and
//! merges the catalogs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use polyglot_core::config::HttpConfig;
use polyglot_core::credentials::token_status;
use polyglot_core::{resolve_token, Message, ModelConfig, ProviderKind, ProviderModelInfo};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::anthropic::AnthropicProvider;
use crate::custom::CustomProvider;
use crate::error::ProviderResult;
use crate::google::GoogleProvider;
use crate::openai::OpenAiProvider;
use crate::openrouter::OpenRouterProvider;
use crate::traits::{StreamCallback, TranslationProvider};

// ─────────────────────────────────────────────
// Provider
// ─────────────────────────────────────────────

/// Every supported backend. Cerebras and Nebius are served by `Custom`.
#[derive(Debug)]
pub enum Provider {
    OpenAi(OpenAiProvider),
    Anthropic(AnthropicProvider),
    OpenRouter(OpenRouterProvider),
    Google(GoogleProvider),
    Custom(CustomProvider),
}

impl Provider {
    /// Build the variant for `kind` with an already-resolved token.
    pub fn with_token(
        kind: ProviderKind,
        config: &ModelConfig,
        token: String,
        http: &HttpConfig,
    ) -> ProviderResult<Self> {
        Ok(match kind {
            ProviderKind::OpenAi => Provider::OpenAi(OpenAiProvider::new(config, token, http)?),
            ProviderKind::Anthropic => {
                Provider::Anthropic(AnthropicProvider::new(config, token, http)?)
            }
            ProviderKind::OpenRouter => {
                Provider::OpenRouter(OpenRouterProvider::new(config, token, http)?)
            }
            ProviderKind::Google => Provider::Google(GoogleProvider::new(config, token, http)?),
            ProviderKind::Custom | ProviderKind::Cerebras | ProviderKind::Nebius => {
                Provider::Custom(CustomProvider::new(config, token, http)?)
            }
        })
    }

    fn inner(&self) -> &dyn TranslationProvider {
        match self {
            Provider::OpenAi(p) => p,
            Provider::Anthropic(p) => p,
            Provider::OpenRouter(p) => p,
            Provider::Google(p) => p,
            Provider::Custom(p) => p,
        }
    }
}

#[async_trait]
impl TranslationProvider for Provider {
    fn display_name(&self) -> &str {
        self.inner().display_name()
    }

    async fn translate(
        &self,
        messages: &[Message],
        target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> ProviderResult<String> {
        self.inner().translate(messages, target_lang, callback).await
    }

    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
        self.inner().fetch_models().await
    }
}

/// Validate `config`, resolve its token and build the matching provider.
///
/// Fails before any network call on an unknown vendor, a missing field or a
/// missing token.
pub fn get_provider(config: &ModelConfig, http: &HttpConfig) -> ProviderResult<Provider> {
    let kind = config.validate()?;
    let token = resolve_token(config);
    debug!(
        provider = kind.as_str(),
        model = %config.model_name,
        token = token_status(&token),
        "Creating translation provider"
    );
    Provider::with_token(kind, config, token, http)
}

// ─────────────────────────────────────────────
// Catalog fan-out
// ─────────────────────────────────────────────

/// Vendors whose catalogs the fan-out queries, with a placeholder model.
const CATALOG_VENDORS: &[(ProviderKind, &str)] = &[
    (ProviderKind::OpenAi, "gpt-4o-mini"),
    (ProviderKind::Anthropic, "claude-3-haiku-20240307"),
    (ProviderKind::Google, "gemini-1.5-flash"),
    (ProviderKind::OpenRouter, "openai/gpt-4o-mini"),
];

/// One throwaway provider per catalog vendor that has a token.
///
/// A non-empty entry in `tokens` (keyed by vendor tag, any case) is used
/// as-is; otherwise the usual credential resolution applies.
pub fn catalog_providers(
    tokens: &HashMap<String, String>,
    http: &HttpConfig,
) -> Vec<Arc<dyn TranslationProvider>> {
    let supplied: HashMap<ProviderKind, &str> = tokens
        .iter()
        .filter(|(_, token)| !token.is_empty())
        .filter_map(|(tag, token)| Some((tag.parse::<ProviderKind>().ok()?, token.as_str())))
        .collect();

    let mut providers: Vec<Arc<dyn TranslationProvider>> = Vec::new();
    for (kind, model) in CATALOG_VENDORS {
        let config = ModelConfig::new(kind.as_str(), *model);
        let token = match supplied.get(kind) {
            Some(token) => token.to_string(),
            None => resolve_token(&config),
        };
        if token.is_empty() {
            debug!(provider = kind.as_str(), "No token, skipping catalog");
            continue;
        }
        match Provider::with_token(*kind, &config, token, http) {
            Ok(provider) => providers.push(Arc::new(provider)),
            Err(e) => warn!(provider = kind.as_str(), error = %e, "Cannot build catalog provider"),
        }
    }
    providers
}

/// Query every vendor with a token concurrently and merge the results,
/// sorted by display name. Never fails.
pub async fn get_all_available_models(
    tokens: &HashMap<String, String>,
    http: &HttpConfig,
) -> Vec<ProviderModelInfo> {
    collect_models(catalog_providers(tokens, http), http.catalog_timeout()).await
}

/// Run `fetch_models` on each provider in its own task, bounded by
/// `timeout`. Failures, timeouts and panics contribute no models.
pub async fn collect_models(
    providers: Vec<Arc<dyn TranslationProvider>>,
    timeout: Duration,
) -> Vec<ProviderModelInfo> {
    let mut tasks = JoinSet::new();
    for provider in providers {
        tasks.spawn(async move {
            let name = provider.display_name().to_string();
            let result = tokio::time::timeout(timeout, provider.fetch_models()).await;
            (name, result)
        });
    }

    let mut models = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, Ok(Ok(found)))) => {
                debug!(provider = %name, count = found.len(), "Model catalog received");
                models.extend(found);
            }
            Ok((name, Ok(Err(e)))) => {
                warn!(provider = %name, error = %e, "Model catalog query failed");
            }
            Ok((name, Err(_))) => {
                warn!(provider = %name, timeout_s = timeout.as_secs(), "Model catalog query timed out");
            }
            Err(e) => error!(error = %e, "Model catalog task aborted"),
        }
    }

    models.sort_by(|a, b| a.name.cmp(&b.name));
    info!(count = models.len(), "Model catalogs merged");
    models
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
