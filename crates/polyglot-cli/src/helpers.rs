//! Shared CLI helpers — path expansion and status markers.

use std::path::{Path, PathBuf};

use colored::Colorize;
use polyglot_core::config::get_config_path;

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// The `--config` override, or the default location.
pub fn config_path_or_default(path: Option<&Path>) -> PathBuf {
    path.map(Path::to_path_buf).unwrap_or_else(get_config_path)
}

/// Section title.
pub fn print_title(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!();
}

pub fn ok_mark() -> String {
    "✓".green().to_string()
}

pub fn missing_mark(label: &str) -> String {
    format!("· {label}").dimmed().to_string()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
