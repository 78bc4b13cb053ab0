//! Anthropic Messages API provider.
//!
//! System messages move to the top-level `system` field; everything else is
//! sent as `user` or `assistant`. Streams whenever a callback is supplied.

use async_trait::async_trait;
use polyglot_core::config::HttpConfig;
use polyglot_core::{
    require_token, Message, ModelConfig, ProviderKind, ProviderModelInfo, Role,
};
use reqwest::RequestBuilder;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::http;
use crate::sse::drive_sse_stream;
use crate::traits::{StreamCallback, TranslationProvider};

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

impl<'a> MessagesRequest<'a> {
    fn new(model: &'a str, messages: &'a [Message], stream: bool) -> Self {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        let messages = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: if m.role == Role::Assistant { "assistant" } else { "user" },
                content: &m.content,
            })
            .collect();

        MessagesRequest {
            model,
            max_tokens: MAX_TOKENS,
            messages,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            stream,
        }
    }
}

pub struct AnthropicProvider {
    model: String,
    token: String,
    /// API root without `/v1`.
    base: String,
    http: HttpConfig,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("model", &self.model)
            .field("base", &self.base)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(config: &ModelConfig, token: String, http: &HttpConfig) -> ProviderResult<Self> {
        require_token(ProviderKind::Anthropic, &token)?;
        let endpoint = config
            .effective_endpoint(ProviderKind::Anthropic)
            .unwrap_or_default();

        Ok(AnthropicProvider {
            model: config.model_name.clone(),
            token,
            base: api_root(&endpoint),
            http: http.clone(),
        })
    }

    fn name(&self) -> &'static str {
        ProviderKind::Anthropic.display_name()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-api-key", &self.token)
            .header("anthropic-version", API_VERSION)
    }
}

/// Accepts the root, `/v1` or `/v1/messages` form of the endpoint.
fn api_root(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    let base = base.strip_suffix("/messages").unwrap_or(base);
    let base = base.strip_suffix("/v1").unwrap_or(base);
    base.to_string()
}

fn text_delta(event: &Value) -> Option<String> {
    if event.get("type")?.as_str()? != "content_block_delta" {
        return None;
    }
    let delta = event.get("delta")?;
    if delta.get("type")?.as_str()? != "text_delta" {
        return None;
    }
    delta.get("text")?.as_str().map(String::from)
}

#[async_trait]
impl TranslationProvider for AnthropicProvider {
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
        let body = MessagesRequest::new(&self.model, messages, streaming);
        debug!(
            provider = self.name(),
            model = %self.model,
            has_system = body.system.is_some(),
            streaming,
            "Calling Anthropic messages"
        );

        let client = http::build_client(&self.http)?;
        let url = format!("{}/v1/messages", self.base);
        let request = self.authorize(client.post(&url)).json(&body);
        let response = http::send(&client, request, self.name(), "translation", self.http.debug).await?;

        if streaming {
            return drive_sse_stream(self.name(), response, text_delta, callback.as_ref()).await;
        }

        let value = http::read_json(self.name(), response, self.http.debug).await?;
        value
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| ProviderError::protocol(self.name(), "missing content[0].text"))
    }

    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
        let client = http::build_client(&self.http)?;
        let url = format!("{}/v1/models", self.base);
        let request = self.authorize(client.get(&url));
        let response =
            http::send(&client, request, self.name(), "model listing", self.http.debug).await?;
        let value = http::read_json(self.name(), response, self.http.debug).await?;

        Ok(value
            .get("data")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|m| {
                let id = m.get("id").and_then(Value::as_str)?;
                let display = m.get("display_name").and_then(Value::as_str).unwrap_or(id);
                Some(ProviderModelInfo::new(
                    format!("Anthropic - {display}"),
                    id,
                    format!("Anthropic {display} model"),
                ))
            })
            .collect())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
