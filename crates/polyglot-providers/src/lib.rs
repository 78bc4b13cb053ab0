//! Provider layer for Polyglot.
//!
//! One uniform `translate` contract over heterogeneous vendor HTTP APIs.
//!
//! # Architecture
//!
//! - [`traits::TranslationProvider`] — capability every backend implements
//! - [`factory::Provider`] — closed set of backends, built by [`factory::get_provider`]
//! - [`factory::get_all_available_models`] — concurrent catalog fan-out
//! - [`translator::Translator`] — prompt assembly, cancellation, error wrapping
//! - [`http`] / [`sse`] — diagnostics, status mapping and stream decoding

pub mod anthropic;
pub mod chat;
pub mod custom;
pub mod error;
pub mod factory;
pub mod google;
pub mod http;
pub mod openai;
pub mod openrouter;
pub mod sse;
pub mod traits;
pub mod translator;

pub use error::{ErrorKind, ProviderError, ProviderResult};
pub use factory::{collect_models, get_all_available_models, get_provider, Provider};
pub use traits::{stream_callback, StreamCallback, TranslationProvider};
pub use translator::{TranslationError, Translator};
