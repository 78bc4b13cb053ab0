//! Config loader — reads `~/.polyglot/config.json` and merges env vars.
//!
//! Precedence, lowest first: `Config::default()`, the JSON file, then
//! `POLYGLOT_<SECTION>__<FIELD>` environment variables. A missing or broken
//! file never fails the load; it only costs the file layer.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::Config;

pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load from `path` (or the default location) and apply env overrides.
pub fn load_config(path: Option<&Path>) -> Config {
    let path = path.map_or_else(get_config_path, Path::to_path_buf);
    let base = if path.is_file() {
        read_config_file(&path).unwrap_or_else(|reason| {
            warn!(path = %path.display(), %reason, "config file ignored, using defaults");
            Config::default()
        })
    } else {
        info!(path = %path.display(), "no config file, using defaults");
        Config::default()
    };
    with_env_overrides(base, |name| std::env::var(name).ok())
}

fn read_config_file(path: &Path) -> Result<Config, String> {
    debug!(path = %path.display(), "reading config");
    let raw = std::fs::read_to_string(path).map_err(|e| format!("unreadable: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("invalid JSON: {e}"))
}

/// Write `config` as pretty camelCase JSON, creating parent directories.
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let path = path.map_or_else(get_config_path, Path::to_path_buf);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(&path, json)?;
    debug!(path = %path.display(), "config saved");
    Ok(())
}

/// Overlay environment variables read through `lookup`.
///
/// | variable | field |
/// |---|---|
/// | `POLYGLOT_MODELS__CURRENT` | `models.current` |
/// | `POLYGLOT_LANGUAGES__CURRENT` | `languages.current` |
/// | `POLYGLOT_SYSTEM_PROMPT` | `system_prompt` |
/// | `POLYGLOT_HTTP__TIMEOUT_SECS` | `http.timeout_secs` (`0`, `none` or empty clear it) |
/// | `POLYGLOT_HTTP__CATALOG_TIMEOUT_SECS` | `http.catalog_timeout_secs` (must be positive) |
/// | `POLYGLOT_HTTP__DEBUG` | `http.debug` (`1` or `true`) |
fn with_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(current) = lookup("POLYGLOT_MODELS__CURRENT") {
        config.models.current = Some(current);
    }
    if let Some(lang) = lookup("POLYGLOT_LANGUAGES__CURRENT") {
        config.languages.current = lang;
    }
    if let Some(prompt) = lookup("POLYGLOT_SYSTEM_PROMPT") {
        config.system_prompt = prompt;
    }

    if let Some(raw) = lookup("POLYGLOT_HTTP__TIMEOUT_SECS") {
        let trimmed = raw.trim();
        if matches!(trimmed, "" | "0" | "none") {
            config.http.timeout_secs = None;
        } else if let Ok(secs) = trimmed.parse::<u64>() {
            config.http.timeout_secs = Some(secs);
        } else {
            warn!(value = %raw, "ignoring invalid POLYGLOT_HTTP__TIMEOUT_SECS");
        }
    }
    // Zero would expire every catalog query immediately.
    match lookup("POLYGLOT_HTTP__CATALOG_TIMEOUT_SECS").map(|raw| raw.trim().parse::<u64>()) {
        Some(Ok(secs)) if secs > 0 => config.http.catalog_timeout_secs = secs,
        Some(_) => warn!("ignoring invalid POLYGLOT_HTTP__CATALOG_TIMEOUT_SECS"),
        None => {}
    }
    if let Some(flag) = lookup("POLYGLOT_HTTP__DEBUG") {
        config.http.debug = matches!(flag.trim(), "1" | "true");
    }

    config
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::DEFAULT_SYSTEM_PROMPT;
    use crate::types::ModelConfig;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    fn file_with(dir: &tempfile::TempDir, json: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = read_or_default(Path::new("/nonexistent/polyglot/config.json"));
        assert!(config.models.available.is_empty());
        assert_eq!(config.languages.available.len(), 3);
    }

    #[test]
    fn reads_camel_case_models() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(
            &dir,
            r#"{
                "models": {
                    "available": [{
                        "name": "GPT-4",
                        "provider": "OpenAI",
                        "modelName": "gpt-4",
                        "accessTokenEnv": "MY_OPENAI_KEY",
                        "streaming": true
                    }],
                    "current": "GPT-4"
                },
                "http": { "timeoutSecs": 60 }
            }"#,
        );

        let config = read_config_file(&path).unwrap();
        let model = config.models.current_model().unwrap();
        assert_eq!(model.model_name, "gpt-4");
        assert_eq!(model.access_token_env.as_deref(), Some("MY_OPENAI_KEY"));
        assert!(model.streaming);
        assert_eq!(config.http.timeout_secs, Some(60));
        assert_eq!(config.system_prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn broken_json_is_reported_and_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "not valid json {{{");
        assert!(read_config_file(&path).unwrap_err().starts_with("invalid JSON"));
        assert!(read_or_default(&path).models.available.is_empty());
    }

    #[test]
    fn empty_object_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = file_with(&dir, "{}");
        assert_eq!(read_config_file(&path).unwrap().languages.current, "English");
    }

    #[test]
    fn save_creates_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.system_prompt = "Translate into {language}.".to_string();
        config.models.available.push(ModelConfig {
            name: "Local".to_string(),
            ..ModelConfig::new("custom", "llama3").with_endpoint("http://localhost:11434/v1")
        });
        save_config(&config, Some(&path)).unwrap();

        let reloaded = read_config_file(&path).unwrap();
        assert_eq!(reloaded.system_prompt, "Translate into {language}.");
        assert_eq!(reloaded.models.available[0].api_endpoint, "http://localhost:11434/v1");

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("systemPrompt").is_some());
        assert!(raw["http"].get("catalogTimeoutSecs").is_some());
    }

    #[test]
    fn env_overrides_http_settings() {
        let config = with_env_overrides(
            Config::default(),
            env(&[
                ("POLYGLOT_HTTP__TIMEOUT_SECS", "45"),
                ("POLYGLOT_HTTP__CATALOG_TIMEOUT_SECS", "3"),
                ("POLYGLOT_HTTP__DEBUG", "1"),
            ]),
        );
        assert_eq!(config.http.timeout_secs, Some(45));
        assert_eq!(config.http.catalog_timeout_secs, 3);
        assert!(config.http.debug);
    }

    #[test]
    fn env_can_clear_timeout() {
        let mut base = Config::default();
        base.http.timeout_secs = Some(10);
        let config = with_env_overrides(base, env(&[("POLYGLOT_HTTP__TIMEOUT_SECS", "none")]));
        assert_eq!(config.http.timeout_secs, None);
    }

    #[test]
    fn env_ignores_garbage_numbers() {
        let config = with_env_overrides(
            Config::default(),
            env(&[("POLYGLOT_HTTP__CATALOG_TIMEOUT_SECS", "soon")]),
        );
        assert_eq!(config.http.catalog_timeout_secs, Config::default().http.catalog_timeout_secs);
    }

    #[test]
    fn env_rejects_zero_catalog_timeout() {
        let config = with_env_overrides(
            Config::default(),
            env(&[("POLYGLOT_HTTP__CATALOG_TIMEOUT_SECS", "0")]),
        );
        assert_eq!(config.http.catalog_timeout_secs, Config::default().http.catalog_timeout_secs);
    }

    #[test]
    fn env_overrides_selection() {
        let config = with_env_overrides(
            Config::default(),
            env(&[
                ("POLYGLOT_MODELS__CURRENT", "Claude"),
                ("POLYGLOT_LANGUAGES__CURRENT", "Japanese"),
            ]),
        );
        assert_eq!(config.models.current.as_deref(), Some("Claude"));
        assert_eq!(config.languages.current, "Japanese");
    }

    fn read_or_default(path: &Path) -> Config {
        read_config_file(path).unwrap_or_default()
    }
}
