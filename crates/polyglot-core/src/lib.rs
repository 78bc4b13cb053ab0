//! Core of Polyglot: the data model shared by the provider layer and its
//! callers, credential resolution, cancellation, and configuration.
//!
//! Nothing in this crate performs network I/O.

pub mod cancellation;
pub mod config;
pub mod credentials;
pub mod error;
pub mod types;
pub mod utils;

pub use cancellation::CancellationToken;
pub use credentials::{require_token, resolve_token};
pub use error::ConfigError;
pub use types::{Message, ModelConfig, ProviderKind, ProviderModelInfo, Role};
