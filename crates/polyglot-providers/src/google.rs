//! Google Generative Language API provider.
//!
//! The chat prompt is flattened into one text part:
//! `Instructions: …\n\nText to translate: …\n\nTranslation: …`.

use async_trait::async_trait;
use polyglot_core::config::HttpConfig;
use polyglot_core::{require_token, Message, ModelConfig, ProviderKind, ProviderModelInfo, Role};
use reqwest::RequestBuilder;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::http;
use crate::sse::drive_sse_stream;
use crate::traits::{StreamCallback, TranslationProvider};

pub struct GoogleProvider {
    model: String,
    token: String,
    base: String,
    http: HttpConfig,
}

impl std::fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("model", &self.model)
            .field("base", &self.base)
            .finish()
    }
}

impl GoogleProvider {
    pub fn new(config: &ModelConfig, token: String, http: &HttpConfig) -> ProviderResult<Self> {
        require_token(ProviderKind::Google, &token)?;
        let endpoint = config
            .effective_endpoint(ProviderKind::Google)
            .unwrap_or_default();

        Ok(GoogleProvider {
            model: config
                .model_name
                .trim_start_matches("models/")
                .to_string(),
            token,
            base: endpoint.trim().trim_end_matches('/').to_string(),
            http: http.clone(),
        })
    }

    fn name(&self) -> &'static str {
        ProviderKind::Google.display_name()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("x-goog-api-key", &self.token)
    }

    fn generate_url(&self, streaming: bool) -> String {
        if streaming {
            format!("{}/models/{}:streamGenerateContent?alt=sse", self.base, self.model)
        } else {
            format!("{}/models/{}:generateContent", self.base, self.model)
        }
    }
}

/// Flatten role-tagged messages into the single-prompt form.
pub fn flatten_prompt(messages: &[Message]) -> String {
    let mut prompt = String::new();
    for message in messages {
        let label = match message.role {
            Role::System => "Instructions",
            Role::User => "Text to translate",
            Role::Assistant => "Translation",
        };
        prompt.push_str(label);
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push_str("\n\n");
    }
    prompt.trim().to_string()
}

/// Concatenated text of `candidates[0].content.parts[*].text`.
fn candidate_text(value: &Value) -> Option<String> {
    let parts = value
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    Some(
        parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect(),
    )
}

#[async_trait]
impl TranslationProvider for GoogleProvider {
    fn display_name(&self) -> &str {
        self.name()
    }

    async fn translate(
        &self,
        messages: &[Message],
        _target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> ProviderResult<String> {
        let streaming = callback.is_some();
        let body = json!({
            "contents": [{"role": "user", "parts": [{"text": flatten_prompt(messages)}]}]
        });
        debug!(provider = self.name(), model = %self.model, streaming, "Calling Gemini");

        let client = http::build_client(&self.http)?;
        let request = self.authorize(client.post(self.generate_url(streaming))).json(&body);
        let response =
            http::send(&client, request, self.name(), "translation", self.http.debug).await?;

        if streaming {
            return drive_sse_stream(self.name(), response, candidate_text, callback.as_ref())
                .await;
        }

        let value = http::read_json(self.name(), response, self.http.debug).await?;
        candidate_text(&value)
            .ok_or_else(|| ProviderError::protocol(self.name(), "missing candidates[0].content"))
    }

    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
        let client = http::build_client(&self.http)?;
        let request = self.authorize(client.get(format!("{}/models", self.base)));
        let response =
            http::send(&client, request, self.name(), "model listing", self.http.debug).await?;
        let value = http::read_json(self.name(), response, self.http.debug).await?;

        let supports_generation = |m: &Value| {
            m.get("supportedGenerationMethods")
                .and_then(Value::as_array)
                .is_some_and(|methods| methods.iter().any(|x| x == "generateContent"))
        };

        Ok(value
            .get("models")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter(|m| supports_generation(*m))
            .filter_map(|m| {
                let id = m.get("name").and_then(Value::as_str)?;
                let id = id.strip_prefix("models/").unwrap_or(id);
                let display = m.get("displayName").and_then(Value::as_str).unwrap_or(id);
                let description = m
                    .get("description")
                    .and_then(Value::as_str)
                    .map(String::from)
                    .unwrap_or_else(|| format!("Google {display} model"));
                Some(ProviderModelInfo::new(
                    format!("Google - {display}"),
                    id,
                    description,
                ))
            })
            .collect())
    }
}
