//! Translation façade — the entry point the rest of the application calls.
//!
//! Owns one provider and the cached system prompt, builds the two-message
//! prompt and turns every provider failure into a [`TranslationError`].

use std::sync::Arc;

use polyglot_core::config::schema::LANGUAGE_PLACEHOLDER;
use polyglot_core::config::HttpConfig;
use polyglot_core::{CancellationToken, Message, ModelConfig};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::error::ProviderError;
use crate::factory::get_provider;
use crate::traits::{StreamCallback, TranslationProvider};

/// Uniform failure type of [`Translator::translate`].
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The caller aborted the request.
    #[error("translation cancelled")]
    Cancelled,

    #[error("translation failed: {0}")]
    Failed(#[from] ProviderError),
}

impl TranslationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TranslationError::Cancelled)
    }

    /// The underlying provider error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            TranslationError::Failed(e) => Some(e),
            TranslationError::Cancelled => None,
        }
    }
}

pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    system_prompt: String,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("provider", &self.provider.display_name())
            .field("system_prompt_len", &self.system_prompt.len())
            .finish()
    }
}

impl Translator {
    /// Resolve the provider for `config` and bind it.
    pub fn new(
        config: &ModelConfig,
        system_prompt: impl Into<String>,
        http: &HttpConfig,
    ) -> Result<Self, TranslationError> {
        let provider = get_provider(config, http).map_err(|e| {
            error!(model = %config.label(), error = %e, "Cannot create provider");
            TranslationError::from(e)
        })?;
        info!(provider = provider.display_name(), model = %config.model_name, "Translator ready");
        Ok(Self::with_provider(Arc::new(provider), system_prompt))
    }

    /// Wrap an existing provider.
    pub fn with_provider(
        provider: Arc<dyn TranslationProvider>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Translator {
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Replace the cached prompt; later calls use it.
    pub fn update_system_prompt(&mut self, system_prompt: impl Into<String>) {
        self.system_prompt = system_prompt.into();
        debug!("System prompt updated");
    }

    pub fn provider_name(&self) -> &str {
        self.provider.display_name()
    }

    /// The system message for `target_lang`.
    pub fn render_system_prompt(&self, target_lang: &str) -> String {
        if self.system_prompt.contains(LANGUAGE_PLACEHOLDER) {
            self.system_prompt.replace(LANGUAGE_PLACEHOLDER, target_lang)
        } else {
            format!("Target language: {target_lang}.\n\n{}", self.system_prompt)
        }
    }

    /// Translate `text` into `target_lang`.
    ///
    /// Empty input returns `""` without contacting the provider.
    pub async fn translate(
        &self,
        text: &str,
        target_lang: &str,
        callback: Option<StreamCallback>,
    ) -> Result<String, TranslationError> {
        self.translate_cancellable(text, target_lang, callback, &CancellationToken::new())
            .await
    }

    /// Like [`translate`](Self::translate), aborting when `cancel` fires.
    ///
    /// On cancellation the in-flight request is dropped, which closes its
    /// connection, and [`TranslationError::Cancelled`] is returned.
    pub async fn translate_cancellable(
        &self,
        text: &str,
        target_lang: &str,
        callback: Option<StreamCallback>,
        cancel: &CancellationToken,
    ) -> Result<String, TranslationError> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let messages = [
            Message::system(self.render_system_prompt(target_lang)),
            Message::user(text),
        ];
        let provider = self.provider.display_name();
        debug!(provider, target_lang, chars = text.len(), "Translating");

        let outcome = cancel
            .run_until_cancelled(self.provider.translate(&messages, target_lang, callback))
            .await;

        match outcome {
            None => {
                info!(provider, "Translation cancelled");
                Err(TranslationError::Cancelled)
            }
            Some(Ok(translation)) => {
                debug!(provider, chars = translation.len(), "Translation complete");
                Ok(translation)
            }
            Some(Err(e)) => {
                error!(provider, error = %e, kind = ?e.kind(), "Translation failed");
                Err(e.into())
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, ProviderResult};
    use crate::traits::stream_callback;
    use async_trait::async_trait;
    use polyglot_core::ProviderModelInfo;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Records the prompt and answers with fixed fragments.
    struct Scripted {
        fragments: Vec<&'static str>,
        calls: AtomicUsize,
        last_messages: Mutex<Vec<Message>>,
        delay: Option<Duration>,
        fail: bool,
    }

    impl Scripted {
        fn new(fragments: Vec<&'static str>) -> Self {
            Scripted {
                fragments,
                calls: AtomicUsize::new(0),
                last_messages: Mutex::new(Vec::new()),
                delay: None,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl TranslationProvider for Scripted {
        fn display_name(&self) -> &str {
            "Scripted"
        }

        async fn translate(
            &self,
            messages: &[Message],
            _target_lang: &str,
            callback: Option<StreamCallback>,
        ) -> ProviderResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_messages.lock().unwrap() = messages.to_vec();
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ProviderError::RateLimited {
                    provider: "Scripted".to_string(),
                    detail: None,
                });
            }
            let mut text = String::new();
            for fragment in &self.fragments {
                text.push_str(fragment);
                if let Some(ref callback) = callback {
                    let _ = callback(fragment.to_string()).await;
                }
            }
            Ok(text)
        }

        async fn fetch_models(&self) -> ProviderResult<Vec<ProviderModelInfo>> {
            Ok(Vec::new())
        }
    }

    fn collector() -> (StreamCallback, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback = stream_callback(move |fragment| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push(fragment);
                Ok(())
            }
        });
        (callback, seen)
    }

    #[tokio::test]
    async fn test_empty_input_skips_provider() {
        let provider = Arc::new(Scripted::new(vec!["x"]));
        let translator = Translator::with_provider(provider.clone(), "Translate to {language}.");
        let out = translator.translate("", "French", None).await.unwrap();
        assert_eq!(out, "");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_prompt_shape_with_placeholder() {
        let provider = Arc::new(Scripted::new(vec!["Bonjour"]));
        let translator = Translator::with_provider(provider.clone(), "Translate to {language}.");
        translator.translate("Hello", "French", None).await.unwrap();

        let messages = provider.last_messages.lock().unwrap().clone();
        assert_eq!(
            messages,
            vec![Message::system("Translate to French."), Message::user("Hello")]
        );
    }

    #[test]
    fn test_prompt_without_placeholder_gets_prefix() {
        let translator =
            Translator::with_provider(Arc::new(Scripted::new(vec![])), "Keep formatting.");
        assert_eq!(
            translator.render_system_prompt("Kazakh"),
            "Target language: Kazakh.\n\nKeep formatting."
        );
    }

    #[tokio::test]
    async fn test_update_system_prompt() {
        let provider = Arc::new(Scripted::new(vec!["ok"]));
        let mut translator = Translator::with_provider(provider.clone(), "old {language}");
        translator.update_system_prompt("new {language}");
        translator.translate("Hi", "Russian", None).await.unwrap();
        assert_eq!(translator.system_prompt(), "new {language}");
        assert_eq!(provider.last_messages.lock().unwrap()[0].content, "new Russian");
    }

    #[tokio::test]
    async fn test_stream_fragments_concatenate() {
        let provider = Arc::new(Scripted::new(vec!["Guten", " ", "Tag"]));
        let translator = Translator::with_provider(provider, "{language}");
        let (callback, seen) = collector();
        let out = translator
            .translate("Good day", "German", Some(callback))
            .await
            .unwrap();
        assert_eq!(out, seen.lock().unwrap().concat());
        assert_eq!(out, "Guten Tag");
    }

    #[tokio::test]
    async fn test_provider_error_is_wrapped() {
        let mut scripted = Scripted::new(vec![]);
        scripted.fail = true;
        let translator = Translator::with_provider(Arc::new(scripted), "{language}");
        let err = translator.translate("Hi", "French", None).await.unwrap_err();
        assert!(!err.is_cancelled());
        assert_eq!(err.provider_error().unwrap().kind(), ErrorKind::RateLimit);
        assert!(err.to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn test_cancellation_is_distinguishable() {
        let mut scripted = Scripted::new(vec!["late"]);
        scripted.delay = Some(Duration::from_secs(30));
        let translator = Translator::with_provider(Arc::new(scripted), "{language}");

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = translator
            .translate_cancellable("Hi", "French", None, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_new_rejects_unknown_provider() {
        let config = ModelConfig::new("InvalidProvider", "x");
        let err = Translator::new(&config, "{language}", &HttpConfig::default()).unwrap_err();
        assert_eq!(err.provider_error().unwrap().kind(), ErrorKind::Configuration);
    }

    // ── End to end over HTTP ──

    #[tokio::test]
    async fn test_openai_scenario_non_streaming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "messages": [
                    {"role": "system", "content": "Translate into French."},
                    {"role": "user", "content": "Hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "Bonjour"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ModelConfig::new("openai", "gpt-4")
            .with_token("sk-test")
            .with_endpoint(server.uri());
        let translator =
            Translator::new(&config, "Translate into {language}.", &HttpConfig::default()).unwrap();
        let out = translator.translate("Hello", "French", None).await.unwrap();
        assert_eq!(out, "Bonjour");
    }

    #[tokio::test]
    async fn test_openai_scenario_streaming() {
        let server = MockServer::start().await;
        let body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Bon\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"jour\"}}]}\n\n",
            "data: [DONE]\n\n",
        );
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&server)
            .await;

        let config = ModelConfig::new("openai", "gpt-4")
            .with_token("sk-test")
            .with_endpoint(server.uri())
            .with_streaming(true);
        let translator =
            Translator::new(&config, "Translate into {language}.", &HttpConfig::default()).unwrap();
        let (callback, seen) = collector();
        let out = translator
            .translate("Hello", "French", Some(callback))
            .await
            .unwrap();
        assert_eq!(out, "Bonjour");
        assert_eq!(*seen.lock().unwrap(), vec!["Bon", "jour"]);
    }

    #[tokio::test]
    async fn test_stream_error_is_a_failure_not_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(concat!(
                        "data: {\"error\":{\"code\":503,\"message\":\"no capacity\"}}\n\n",
                        "data: [DONE]\n\n",
                    )),
            )
            .mount(&server)
            .await;

        let config = ModelConfig::new("openai", "gpt-4")
            .with_token("sk-test")
            .with_endpoint(server.uri())
            .with_streaming(true);
        let translator = Translator::new(&config, "{language}", &HttpConfig::default()).unwrap();
        let (callback, seen) = collector();
        let err = translator
            .translate("Hello", "French", Some(callback))
            .await
            .unwrap_err();
        assert!(!err.is_cancelled());
        assert_eq!(err.provider_error().unwrap().kind(), ErrorKind::VendorServer);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = ModelConfig::new("openai", "gpt-4")
            .with_token("sk-bad")
            .with_endpoint(server.uri());
        let translator = Translator::new(&config, "{language}", &HttpConfig::default()).unwrap();
        let err = translator.translate("Hello", "French", None).await.unwrap_err();
        assert_eq!(err.provider_error().unwrap().kind(), ErrorKind::Authentication);
        assert!(err.to_string().contains("OpenAI"));
    }

    #[tokio::test]
    async fn test_cancel_over_http_drops_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(30))
                    .set_body_json(json!({"choices": [{"message": {"content": "late"}}]})),
            )
            .mount(&server)
            .await;

        let config = ModelConfig::new("custom", "llama3").with_endpoint(server.uri());
        let translator = Translator::new(&config, "{language}", &HttpConfig::default()).unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = translator
            .translate_cancellable("Hello", "French", None, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
