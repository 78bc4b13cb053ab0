//! `polyglot translate` — one translation, streamed to stdout.
//!
//! Ctrl-C cancels the in-flight request and exits with status 130.

use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use polyglot_core::config::{load_config, Config};
use polyglot_core::{CancellationToken, ModelConfig};
use polyglot_providers::{stream_callback, StreamCallback, Translator};

/// Exit status used when the user interrupts a translation.
const EXIT_CANCELLED: i32 = 130;

pub struct TranslateArgs {
    pub text: Option<String>,
    pub lang: Option<String>,
    pub model: Option<String>,
    pub stream: bool,
}

pub async fn run(args: TranslateArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path);
    let mut model = select_model(&config, args.model.as_deref())?;
    if !args.stream {
        model.streaming = false;
    }
    let target_lang = args
        .lang
        .unwrap_or_else(|| config.languages.current.clone());

    let text = match args.text {
        Some(text) => text,
        None => read_stdin().await?,
    };

    let translator = Translator::new(&model, config.effective_system_prompt(), &config.http)
        .with_context(|| format!("cannot use model '{}'", model.label()))?;
    info!(model = %model.label(), provider = translator.provider_name(), lang = %target_lang, "translate");

    let streamed = Arc::new(AtomicBool::new(false));
    let callback = args.stream.then(|| printing_callback(streamed.clone()));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt received");
            on_interrupt.cancel();
        }
    });

    match translator
        .translate_cancellable(&text, &target_lang, callback, &cancel)
        .await
    {
        Ok(translation) => {
            if streamed.load(Ordering::SeqCst) {
                println!();
            } else if !translation.is_empty() {
                println!("{translation}");
            }
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            println!();
            eprintln!("{}", "cancelled".yellow());
            std::process::exit(EXIT_CANCELLED);
        }
        Err(e) => Err(e).context("translation failed"),
    }
}

/// The `--model` entry by name, or the configured current model.
pub fn select_model(config: &Config, requested: Option<&str>) -> Result<ModelConfig> {
    if config.models.available.is_empty() {
        bail!("no models configured; run `polyglot init` and edit the config file");
    }
    match requested {
        Some(name) => match config.models.get(name) {
            Some(model) => Ok(model.clone()),
            None => {
                let known: Vec<&str> = config.models.available.iter().map(|m| m.label()).collect();
                bail!("unknown model '{name}' (configured: {})", known.join(", "))
            }
        },
        None => config
            .models
            .current_model()
            .cloned()
            .context("no current model configured"),
    }
}

/// Prints each fragment as it arrives and records that streaming happened.
fn printing_callback(streamed: Arc<AtomicBool>) -> StreamCallback {
    stream_callback(move |fragment: String| {
        let streamed = streamed.clone();
        async move {
            streamed.store(true, Ordering::SeqCst);
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(fragment.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    })
}

async fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .context("failed to read text from stdin")?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(names: &[&str], current: Option<&str>) -> Config {
        let mut config = Config::default();
        for name in names {
            config.models.available.push(ModelConfig {
                name: name.to_string(),
                ..ModelConfig::new("openai", "gpt-4o-mini")
            });
        }
        config.models.current = current.map(String::from);
        config
    }

    #[test]
    fn select_named_model() {
        let config = config_with(&["fast", "smart"], Some("fast"));
        assert_eq!(select_model(&config, Some("smart")).unwrap().name, "smart");
    }

    #[test]
    fn select_current_model() {
        let config = config_with(&["fast", "smart"], Some("smart"));
        assert_eq!(select_model(&config, None).unwrap().name, "smart");
    }

    #[test]
    fn select_unknown_model_lists_known() {
        let config = config_with(&["fast"], None);
        let err = select_model(&config, Some("nope")).unwrap_err().to_string();
        assert!(err.contains("nope"));
        assert!(err.contains("fast"));
    }

    #[test]
    fn select_without_models() {
        let err = select_model(&Config::default(), None).unwrap_err().to_string();
        assert!(err.contains("polyglot init"));
    }
}
