//! Server-Sent-Events reader for streaming completions.
//!
//! Framing (line reassembly across chunks, UTF-8, `event:` and comment
//! lines) is handled by `eventsource-stream`; this module decodes the JSON
//! payloads, stops at `[DONE]` and turns in-stream vendor errors into
//! [`ProviderError`]s.

use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures_util::{Stream, StreamExt};
use reqwest::Response;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::traits::StreamCallback;

const DONE_MARKER: &str = "[DONE]";

enum EventOutcome {
    Done,
    Delta(String),
    Skip,
}

/// Consume an SSE response, forwarding each delta and returning the full text.
///
/// `extract` pulls the text delta out of one decoded event. Reading stops at
/// `data: [DONE]` or at end of body. An error event from the vendor fails
/// the whole call, even if some text was already delivered.
pub async fn drive_sse_stream<F>(
    provider: &str,
    response: Response,
    extract: F,
    callback: Option<&StreamCallback>,
) -> ProviderResult<String>
where
    F: FnMut(&Value) -> Option<String>,
{
    drive_byte_stream(provider, response.bytes_stream(), extract, callback).await
}

async fn drive_byte_stream<S, B, F>(
    provider: &str,
    bytes: S,
    mut extract: F,
    callback: Option<&StreamCallback>,
) -> ProviderResult<String>
where
    S: Stream<Item = Result<B, reqwest::Error>>,
    B: AsRef<[u8]>,
    F: FnMut(&Value) -> Option<String>,
{
    let mut events = std::pin::pin!(bytes.eventsource());
    let mut text = String::new();
    let mut fragments = 0usize;

    while let Some(event) = events.next().await {
        let event = event.map_err(|e| framing_error(provider, e))?;
        match process_event(provider, &event, &mut extract)? {
            EventOutcome::Done => break,
            EventOutcome::Delta(delta) => {
                fragments += 1;
                deliver(provider, &mut text, delta, callback).await;
            }
            EventOutcome::Skip => {}
        }
    }

    debug!(provider, fragments, chars = text.len(), "Stream finished");
    Ok(text)
}

fn framing_error(provider: &str, e: EventStreamError<reqwest::Error>) -> ProviderError {
    match e {
        EventStreamError::Transport(source) => ProviderError::transport(provider, source),
        other => ProviderError::protocol(provider, format!("malformed event stream: {other}")),
    }
}

fn process_event<F>(provider: &str, event: &Event, extract: &mut F) -> ProviderResult<EventOutcome>
where
    F: FnMut(&Value) -> Option<String>,
{
    let payload = event.data.trim();
    if payload == DONE_MARKER {
        return Ok(EventOutcome::Done);
    }
    if payload.is_empty() {
        return Ok(EventOutcome::Skip);
    }

    let value = match serde_json::from_str::<Value>(payload) {
        Ok(value) => value,
        Err(_) if event.event == "error" => {
            return Err(ProviderError::protocol(provider, format!("stream error: {payload}")));
        }
        Err(e) => {
            debug!(provider, error = %e, "Skipping malformed stream line");
            return Ok(EventOutcome::Skip);
        }
    };

    if let Some(err) = stream_error(provider, &event.event, &value) {
        error!(provider, error = %err, "Vendor reported an error mid-stream");
        return Err(err);
    }

    Ok(match extract(&value) {
        Some(delta) if !delta.is_empty() => EventOutcome::Delta(delta),
        _ => EventOutcome::Skip,
    })
}

/// Classify an error event sent inside an HTTP 200 stream.
///
/// Recognises `{"type":"error","error":{..}}` (Anthropic) and
/// `{"error":{..}}` (OpenAI, OpenRouter, Google).
fn stream_error(provider: &str, event_name: &str, payload: &Value) -> Option<ProviderError> {
    let is_error_type = payload.get("type").and_then(Value::as_str) == Some("error");
    let body = match payload.get("error") {
        Some(body) if !body.is_null() => body,
        _ if is_error_type || event_name == "error" => payload,
        _ => return None,
    };

    let message = body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| body.as_str())
        .unwrap_or("stream reported an error")
        .to_string();
    let code = body
        .get("code")
        .and_then(|c| c.as_u64().or_else(|| c.as_str()?.parse().ok()));
    let label = body
        .get("type")
        .or_else(|| body.get("status"))
        .and_then(Value::as_str)
        .unwrap_or_default();

    let provider = provider.to_string();
    let err = match (code, label) {
        (Some(429), _) | (_, "rate_limit_error" | "rate_limit_exceeded" | "RESOURCE_EXHAUSTED") => {
            ProviderError::RateLimited {
                provider,
                detail: Some(message),
            }
        }
        (Some(status @ 500..=599), _) => ProviderError::VendorServer {
            provider,
            status: status as u16,
            detail: Some(message),
        },
        (_, "overloaded_error") => ProviderError::VendorServer {
            provider,
            status: 529,
            detail: Some(message),
        },
        (_, "api_error" | "server_error" | "INTERNAL" | "UNAVAILABLE") => {
            ProviderError::VendorServer {
                provider,
                status: 500,
                detail: Some(message),
            }
        }
        _ => ProviderError::Protocol {
            provider,
            message: format!("stream error: {message}"),
        },
    };
    Some(err)
}

async fn deliver(
    provider: &str,
    text: &mut String,
    delta: String,
    callback: Option<&StreamCallback>,
) {
    text.push_str(&delta);
    if let Some(callback) = callback {
        if let Err(e) = callback(delta).await {
            warn!(provider, error = %e, "Stream callback failed; continuing");
        }
    }
}
