//! HTTP diagnostics shared by every provider.
//!
//! - one short-lived `reqwest::Client` per call, built from [`HttpConfig`]
//! - optional request/response logging with secrets redacted
//! - status-code to [`ProviderError`] mapping

use polyglot_core::config::HttpConfig;
use polyglot_core::utils::truncate_string;
use polyglot_core::ConfigError;
use reqwest::header::HeaderMap;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ProviderError, ProviderResult};

/// Response bodies are cut to this many characters in logs and messages.
pub const MAX_LOGGED_BODY: usize = 500;

/// Headers whose values never reach the logs.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "x-api-key", "x-goog-api-key"];

/// Build a client for a single call.
///
/// `http.timeout_secs = None` leaves the request unbounded.
pub fn build_client(http: &HttpConfig) -> ProviderResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = http.timeout() {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ConfigError::HttpClient(e.to_string()).into())
}

/// Execute `request`, logging it in debug mode, and map non-2xx statuses.
pub async fn send(
    client: &Client,
    request: RequestBuilder,
    provider: &str,
    operation: &str,
    debug_mode: bool,
) -> ProviderResult<Response> {
    let request = request
        .build()
        .map_err(|e| ProviderError::transport(provider, e))?;

    if debug_mode {
        let body = request
            .body()
            .and_then(|b| b.as_bytes())
            .map(|b| truncate_string(&String::from_utf8_lossy(b), MAX_LOGGED_BODY))
            .unwrap_or_default();
        debug!(
            provider,
            method = %request.method(),
            url = %request.url(),
            headers = ?redact_headers(request.headers()),
            body = %body,
            "HTTP request"
        );
    }

    let response = client
        .execute(request)
        .await
        .map_err(|e| ProviderError::transport(provider, e))?;

    check_status(provider, operation, response, debug_mode).await
}

/// Pass successful responses through; turn everything else into an error.
pub async fn check_status(
    provider: &str,
    operation: &str,
    response: Response,
    debug_mode: bool,
) -> ProviderResult<Response> {
    let status = response.status();
    if debug_mode {
        debug!(provider, status = %status, "HTTP response");
    }
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    let body = truncate_string(&body, MAX_LOGGED_BODY);
    error!(provider, operation, status = %status, "API error");
    debug!(provider, body = %body, "API error body");

    Err(map_status(provider, operation, status, debug_mode.then_some(body)))
}

/// Classify a non-success status.
pub fn map_status(
    provider: &str,
    operation: &str,
    status: StatusCode,
    detail: Option<String>,
) -> ProviderError {
    let provider = provider.to_string();
    match status.as_u16() {
        401 => ProviderError::Authentication {
            provider,
            status: 401,
            message: "invalid API key".to_string(),
        },
        403 => ProviderError::Authentication {
            provider,
            status: 403,
            message: "insufficient permissions".to_string(),
        },
        429 => ProviderError::RateLimited { provider, detail },
        code if status.is_server_error() => ProviderError::VendorServer {
            provider,
            status: code,
            detail,
        },
        code => ProviderError::Http {
            provider,
            operation: operation.to_string(),
            status: code,
            detail,
        },
    }
}

/// Read a whole response body as JSON.
pub async fn read_json(provider: &str, response: Response, debug_mode: bool) -> ProviderResult<Value> {
    let text = response
        .text()
        .await
        .map_err(|e| ProviderError::transport(provider, e))?;
    if debug_mode {
        debug!(provider, body = %truncate_string(&text, MAX_LOGGED_BODY), "HTTP response body");
    }
    serde_json::from_str(&text)
        .map_err(|e| ProviderError::protocol(provider, format!("invalid JSON body: {e}")))
}

/// Header list for logs, with credential values replaced.
pub fn redact_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name = name.as_str().to_string();
            let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name, value)
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
