//! Small helpers: data directory and log-safe truncation.

use std::path::PathBuf;

/// `~/.polyglot`, or `./.polyglot` when no home directory is known.
pub fn get_data_path() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".polyglot")
}

/// At most `max_len` characters; longer input ends in `...`.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        None => s.to_string(),
        Some(_) => {
            let keep = max_len.saturating_sub(3);
            let cut = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            format!("{}...", &s[..cut])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_untouched() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn long_input_gets_ellipsis() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
    }

    #[test]
    fn cuts_on_char_boundaries() {
        assert_eq!(truncate_string("привет мир", 6), "при...");
    }

    #[test]
    fn data_path_is_dot_polyglot() {
        assert!(get_data_path().ends_with(".polyglot"));
    }
}
