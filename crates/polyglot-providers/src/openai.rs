//! OpenAI provider.

use async_trait::async_trait;
use polyglot_core::config::HttpConfig;
use polyglot_core::{require_token, Message, ModelConfig, ProviderKind, ProviderModelInfo};
use serde_json::Value;

use crate::chat::{completions_url, models_url, ChatClient};
use crate::error::ProviderResult;
use crate::traits::{StreamCallback, TranslationProvider};

const TEMPERATURE: f32 = 0.7;

/// Model id prefixes that belong to chat-capable families.
const CHAT_MODEL_PREFIXES: &[&str] = &["gpt-", "o1", "o3", "o4", "chatgpt-"];

#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    chat: ChatClient,
    models_url: String,
    streaming: bool,
}

impl OpenAiProvider {
    /// Bind `config` to an already-resolved token.
    pub fn new(config: &ModelConfig, token: String, http: &HttpConfig) -> ProviderResult<Self> {
        require_token(ProviderKind::OpenAi, &token)?;
        let endpoint = config
            .effective_endpoint(ProviderKind::OpenAi)
            .unwrap_or_default();

        Ok(OpenAiProvider {
            chat: ChatClient {
                name: ProviderKind::OpenAi.display_name().to_string(),
                model: config.model_name.clone(),
                url: completions_url(&endpoint),
                authorization: Some(format!("Bearer {token}")),
                extra_headers: Vec::new(),
                temperature: Some(TEMPERATURE),
                http: http.clone(),
            },
            models_url: models_url(&endpoint),
            streaming: config.streaming,
        })
    }
}

#[async_trait]
impl TranslationProvider for OpenAiProvider {
    fn display_name(&self) -> &str {
        &self.chat.name
    }

    async fn translate(
        &self,
        messages: &[Message],
        _target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> ProviderResult<String> {
        match callback.as_ref().filter(|_| self.streaming) {
            Some(callback) => self.chat.complete(messages, Some(callback)).await,
            None => Ok(self.chat.complete(messages, None).await?.trim().to_string()),
        }
    }

    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
        let value = self.chat.get_json(&self.models_url, "model listing").await?;
        Ok(catalog_from_json(&value))
    }
}

fn describe(id: &str) -> String {
    if id.contains("gpt-4") {
        "Most capable GPT-4 family model".to_string()
    } else if id.contains("gpt-3.5") {
        "Fast and efficient GPT-3.5 model".to_string()
    } else {
        format!("OpenAI {id} model")
    }
}

fn catalog_from_json(value: &Value) -> Vec<ProviderModelInfo> {
    let mut models: Vec<ProviderModelInfo> = value
        .get("data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|m| m.get("id").and_then(Value::as_str))
        .filter(|id| CHAT_MODEL_PREFIXES.iter().any(|p| id.starts_with(p)))
        .map(|id| ProviderModelInfo::new(format!("OpenAI - {id}"), id, describe(id)))
        .collect();
    models.sort_by(|a, b| a.model_name.cmp(&b.model_name));
    models
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
