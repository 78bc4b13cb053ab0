//! OpenRouter provider: OpenAI wire format plus attribution headers.
//!
//! Streams whenever the caller supplies a callback, regardless of the
//! model's `streaming` flag.

use async_trait::async_trait;
use polyglot_core::config::HttpConfig;
use polyglot_core::{require_token, Message, ModelConfig, ProviderKind, ProviderModelInfo};
use serde_json::Value;

use crate::chat::{completions_url, models_url, ChatClient};
use crate::error::ProviderResult;
use crate::traits::{StreamCallback, TranslationProvider};

const TEMPERATURE: f32 = 0.7;
const REFERER: &str = "http://localhost";
const TITLE: &str = "Polyglot Translator";

#[derive(Debug, Clone)]
pub struct OpenRouterProvider {
    chat: ChatClient,
    models_url: String,
}

impl OpenRouterProvider {
    pub fn new(config: &ModelConfig, token: String, http: &HttpConfig) -> ProviderResult<Self> {
        require_token(ProviderKind::OpenRouter, &token)?;
        let endpoint = config
            .effective_endpoint(ProviderKind::OpenRouter)
            .unwrap_or_default();

        Ok(OpenRouterProvider {
            chat: ChatClient {
                name: ProviderKind::OpenRouter.display_name().to_string(),
                model: config.model_name.clone(),
                url: completions_url(&endpoint),
                authorization: Some(format!("Bearer {token}")),
                extra_headers: vec![
                    ("HTTP-Referer", REFERER.to_string()),
                    ("X-Title", TITLE.to_string()),
                ],
                temperature: Some(TEMPERATURE),
                http: http.clone(),
            },
            models_url: models_url(&endpoint),
        })
    }
}

#[async_trait]
impl TranslationProvider for OpenRouterProvider {
    fn display_name(&self) -> &str {
        &self.chat.name
    }

    async fn translate(
        &self,
        messages: &[Message],
        _target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> ProviderResult<String> {
        match callback {
            Some(ref callback) => self.chat.complete(messages, Some(callback)).await,
            None => Ok(self.chat.complete(messages, None).await?.trim().to_string()),
        }
    }

    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
        let value = self.chat.get_json(&self.models_url, "model listing").await?;
        Ok(catalog_from_json(&value))
    }
}

fn catalog_from_json(value: &Value) -> Vec<ProviderModelInfo> {
    let mut models: Vec<ProviderModelInfo> = value
        .get("data")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|m| {
            let id = m.get("id").and_then(Value::as_str)?;
            let name = m.get("name").and_then(Value::as_str).unwrap_or(id);
            let description = m
                .get("description")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("OpenRouter {name} model"));
            Some(ProviderModelInfo::new(
                format!("OpenRouter - {name}"),
                id,
                description,
            ))
        })
        .collect();
    models.sort_by(|a, b| a.model_name.cmp(&b.model_name));
    models
}
