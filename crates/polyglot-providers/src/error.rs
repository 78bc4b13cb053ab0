//! Provider error taxonomy.
//!
//! Every variant carries a human-readable message that already names the
//! vendor, so callers can surface `to_string()` directly.

use polyglot_core::ConfigError;
use thiserror::Error;

/// Errors raised by a provider call.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Invalid configuration, raised before any network call.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP 401/403: invalid key or insufficient permission.
    #[error("{provider}: {message} (HTTP {status})")]
    Authentication {
        provider: String,
        status: u16,
        message: String,
    },

    /// HTTP 429.
    #[error("{provider}: rate limit exceeded (HTTP 429){}", detail_suffix(.detail))]
    RateLimited {
        provider: String,
        detail: Option<String>,
    },

    /// HTTP 5xx.
    #[error("{provider}: server-side failure (HTTP {status}){}", detail_suffix(.detail))]
    VendorServer {
        provider: String,
        status: u16,
        detail: Option<String>,
    },

    /// Any other non-success status.
    #[error("{provider}: {operation} failed: HTTP {status}{}", detail_suffix(.detail))]
    Http {
        provider: String,
        operation: String,
        status: u16,
        detail: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("{provider}: unexpected response: {message}")]
    Protocol { provider: String, message: String },

    /// Connection-level failure.
    #[error("{provider}: network error: {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// The configured request timeout elapsed.
    #[error("{provider}: request timed out")]
    Timeout { provider: String },
}

/// Coarse classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Authentication,
    RateLimit,
    VendorServer,
    Http,
    Protocol,
    Network,
    Timeout,
}

impl ProviderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProviderError::Config(_) => ErrorKind::Configuration,
            ProviderError::Authentication { .. } => ErrorKind::Authentication,
            ProviderError::RateLimited { .. } => ErrorKind::RateLimit,
            ProviderError::VendorServer { .. } => ErrorKind::VendorServer,
            ProviderError::Http { .. } => ErrorKind::Http,
            ProviderError::Protocol { .. } => ErrorKind::Protocol,
            ProviderError::Network { .. } => ErrorKind::Network,
            ProviderError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Create a protocol error.
    pub fn protocol(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Protocol {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Wrap a transport error, separating timeouts from other failures.
    pub fn transport(provider: impl Into<String>, source: reqwest::Error) -> Self {
        let provider = provider.into();
        if source.is_timeout() {
            ProviderError::Timeout { provider }
        } else {
            ProviderError::Network { provider, source }
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => format!(": {d}"),
        _ => String::new(),
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_display() {
        let err = ProviderError::Authentication {
            provider: "OpenAI".to_string(),
            status: 401,
            message: "invalid API key".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("OpenAI"));
        assert!(text.contains("invalid"));
        assert!(text.contains("401"));
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[test]
    fn test_http_display_without_detail() {
        let err = ProviderError::Http {
            provider: "Custom".to_string(),
            operation: "translation".to_string(),
            status: 418,
            detail: None,
        };
        assert_eq!(err.to_string(), "Custom: translation failed: HTTP 418");
    }

    #[test]
    fn test_rate_limited_display_with_detail() {
        let err = ProviderError::RateLimited {
            provider: "Anthropic".to_string(),
            detail: Some("slow down".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Anthropic: rate limit exceeded (HTTP 429): slow down"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: ProviderError = ConfigError::UnknownProvider("foo".to_string()).into();
        assert_eq!(err.to_string(), "unknown provider: foo");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
