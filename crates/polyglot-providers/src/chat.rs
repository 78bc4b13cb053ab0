//! OpenAI-shaped `/chat/completions` wire format.
//!
//! Shared by the OpenAI, OpenRouter and custom providers; they differ only in
//! URL handling, headers, temperature and when they stream.

use polyglot_core::config::HttpConfig;
use polyglot_core::Message;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::http;
use crate::sse::drive_sse_stream;
use crate::traits::StreamCallback;

const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    stream: bool,
}

/// A bound chat-completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    pub name: String,
    pub model: String,
    /// Full completions URL.
    pub url: String,
    /// Complete `Authorization` header value, if any.
    pub authorization: Option<String>,
    pub extra_headers: Vec<(&'static str, String)>,
    pub temperature: Option<f32>,
    pub http: HttpConfig,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("url", &self.url)
            .field("authorization", &self.authorization.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ChatClient {
    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(ref value) = self.authorization {
            request = request.header("Authorization", value);
        }
        for (name, value) in &self.extra_headers {
            request = request.header(*name, value);
        }
        request
    }

    /// Run one completion. Streams when `callback` is given.
    pub async fn complete(
        &self,
        messages: &[Message],
        callback: Option<&StreamCallback>,
    ) -> ProviderResult<String> {
        let streaming = callback.is_some();
        debug!(
            provider = %self.name,
            model = %self.model,
            messages = messages.len(),
            streaming,
            "Calling chat completions"
        );

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            stream: streaming,
        };

        let client = http::build_client(&self.http)?;
        let request = self.authorize(client.post(&self.url)).json(&body);
        let response =
            http::send(&client, request, &self.name, "translation", self.http.debug).await?;

        if streaming {
            return drive_sse_stream(&self.name, response, stream_delta, callback).await;
        }

        let value = http::read_json(&self.name, response, self.http.debug).await?;
        message_content(&value).ok_or_else(|| {
            ProviderError::protocol(&self.name, "missing choices[0].message.content")
        })
    }

    /// GET a JSON document with this client's credentials.
    pub async fn get_json(&self, url: &str, operation: &str) -> ProviderResult<Value> {
        let client: Client = http::build_client(&self.http)?;
        let request = self.authorize(client.get(url));
        let response = http::send(&client, request, &self.name, operation, self.http.debug).await?;
        http::read_json(&self.name, response, self.http.debug).await
    }
}

/// `{endpoint}/chat/completions`, or the endpoint itself if it already is one.
pub fn completions_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    if base.ends_with(COMPLETIONS_PATH) {
        base.to_string()
    } else {
        format!("{base}{COMPLETIONS_PATH}")
    }
}

/// `{base}/models`, with any completions suffix removed first.
pub fn models_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    let base = base.strip_suffix(COMPLETIONS_PATH).unwrap_or(base);
    format!("{base}/models")
}

/// `choices[0].message.content`; list content yields its first segment's text.
pub fn message_content(value: &Value) -> Option<String> {
    let content = value.get("choices")?.get(0)?.get("message")?.get("content")?;
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(segments) => Some(
            segments
                .first()
                .and_then(|s| s.get("text"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        ),
        _ => None,
    }
}

/// `choices[0].delta.content` of one stream event.
pub fn stream_delta(event: &Value) -> Option<String> {
    event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .map(String::from)
}
