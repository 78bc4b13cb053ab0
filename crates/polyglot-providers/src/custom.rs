//! Arbitrary OpenAI-compatible endpoints (self-hosted servers, Cerebras, Nebius).

use async_trait::async_trait;
use polyglot_core::config::HttpConfig;
use polyglot_core::{require_token, ConfigError, Message, ModelConfig, ProviderModelInfo};
use serde_json::Value;
use tracing::warn;

use crate::chat::{completions_url, models_url, ChatClient};
use crate::error::ProviderResult;
use crate::traits::{StreamCallback, TranslationProvider};

const TEMPERATURE: f32 = 0.3;

/// Tokens starting with one of these are sent as the full header value.
const AUTH_SCHEMES: &[&str] = &["Bearer ", "Basic ", "Token ", "Api-Key "];

#[derive(Debug, Clone)]
pub struct CustomProvider {
    chat: ChatClient,
    models_url: String,
    streaming: bool,
}

impl CustomProvider {
    /// An empty token is accepted for plain custom endpoints; no
    /// `Authorization` header is sent then.
    pub fn new(config: &ModelConfig, token: String, http: &HttpConfig) -> ProviderResult<Self> {
        let kind = config.kind()?;
        require_token(kind, &token)?;
        let endpoint = config
            .effective_endpoint(kind)
            .ok_or_else(|| ConfigError::MissingField {
                model: config.label().to_string(),
                field: "api_endpoint",
            })?;

        Ok(CustomProvider {
            chat: ChatClient {
                name: kind.display_name().to_string(),
                model: config.model_name.clone(),
                url: completions_url(&endpoint),
                authorization: authorization_header(&token),
                extra_headers: Vec::new(),
                temperature: Some(TEMPERATURE),
                http: http.clone(),
            },
            models_url: models_url(&endpoint),
            streaming: config.streaming,
        })
    }
}

/// `Authorization` value for `token`: verbatim if it names a scheme,
/// otherwise a bearer token. `None` for an empty token.
pub fn authorization_header(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        None
    } else if AUTH_SCHEMES.iter().any(|scheme| token.starts_with(scheme)) {
        Some(token.to_string())
    } else {
        Some(format!("Bearer {token}"))
    }
}

#[async_trait]
impl TranslationProvider for CustomProvider {
    fn display_name(&self) -> &str {
        &self.chat.name
    }

    async fn translate(
        &self,
        messages: &[Message],
        _target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> ProviderResult<String> {
        let callback = callback.as_ref().filter(|_| self.streaming);
        self.chat.complete(messages, callback).await
    }

    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
        let value = self.chat.get_json(&self.models_url, "model listing").await?;
        Ok(catalog_from_json(&self.chat.name, &value))
    }
}

/// Accepts `{"data": [..]}`, `{"models": [..]}` or a bare array.
fn catalog_from_json(provider: &str, value: &Value) -> Vec<ProviderModelInfo> {
    let entries: &[Value] = match value {
        Value::Array(list) => list.as_slice(),
        Value::Object(map) => match map.get("data").or_else(|| map.get("models")) {
            Some(Value::Array(list)) => list.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    if entries.is_empty() {
        warn!(provider, "Unrecognized model listing format");
    }

    let field = |m: &Value, key: &str| m.get(key).and_then(Value::as_str).map(String::from);
    let mut models: Vec<ProviderModelInfo> = entries
        .iter()
        .filter_map(|m| {
            let id = field(m, "id").or_else(|| field(m, "model_id"))?;
            let name = field(m, "name")
                .or_else(|| field(m, "model_name"))
                .unwrap_or_else(|| id.clone());
            let description = format!("{provider} {id} model");
            Some(ProviderModelInfo::new(format!("{provider} - {name}"), id, description))
        })
        .collect();
    models.sort_by(|a, b| a.model_name.cmp(&b.model_name));
    models
}
