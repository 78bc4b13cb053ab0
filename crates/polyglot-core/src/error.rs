//! Configuration errors raised before any network call.

use thiserror::Error;

/// Invalid or incomplete configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The provider tag does not name a supported vendor.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A required `ModelConfig` field is empty.
    #[error("model '{model}' is missing required field '{field}'")]
    MissingField { model: String, field: &'static str },

    /// No access token could be resolved for a vendor that requires one.
    #[error("no access token configured for {provider} (set {hint})")]
    MissingToken { provider: String, hint: String },

    /// The HTTP client could not be built from the `http` settings.
    #[error("cannot build HTTP client: {0}")]
    HttpClient(String),
}
