//! Translation provider trait — the capability every vendor backend offers.
//!
//! A provider binds one (vendor, model, endpoint, token) tuple and exposes
//! two operations: `translate` and the model catalog query.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use polyglot_core::{Message, ProviderModelInfo};
use tracing::warn;

use crate::error::ProviderResult;

/// Receives each streamed text fragment, in arrival order.
///
/// Fragments concatenate to the final translation. An `Err` is logged and the
/// stream keeps going.
pub type StreamCallback = Arc<
    dyn Fn(String) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync,
>;

/// Wrap an async closure as a [`StreamCallback`].
pub fn stream_callback<F, Fut>(f: F) -> StreamCallback
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |fragment| Box::pin(f(fragment)))
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Display name for logging and catalog entries.
    fn display_name(&self) -> &str;

    /// Send the prompt and return the full translation.
    ///
    /// When `callback` is supplied and the provider streams, every non-empty
    /// delta is passed to it before the call returns.
    async fn translate(
        &self,
        messages: &[Message],
        target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> ProviderResult<String>;

    /// Query the vendor's model catalog, surfacing failures.
    async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>>;

    /// Best-effort catalog query: failures are logged and yield an empty list.
    async fn list_available_models(&self) -> Vec<ProviderModelInfo> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(provider = self.display_name(), error = %e, "Model catalog unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use std::sync::Mutex;

    struct Failing;

    #[async_trait]
    impl TranslationProvider for Failing {
        fn display_name(&self) -> &str {
            "Failing"
        }

        async fn translate(
            &self,
            _messages: &[Message],
            _target_lang: &str,
            _callback: Option<StreamCallback>,
        ) -> ProviderResult<String> {
            Err(ProviderError::protocol("Failing", "no"))
        }

        async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
            Err(ProviderError::protocol("Failing", "catalog broken"))
        }
    }

    #[tokio::test]
    async fn test_list_available_models_fails_soft() {
        assert!(Failing.list_available_models().await.is_empty());
    }

    #[tokio::test]
    async fn test_stream_callback_wrapper() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback = stream_callback(move |fragment| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(fragment);
                Ok(())
            }
        });

        callback("Bon".to_string()).await.unwrap();
        callback("jour".to_string()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["Bon", "jour"]);
    }
}
