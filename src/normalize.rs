// src/normalize.rs
//! Free-text cleanup applied before classification and tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches http(s) URLs up to the next whitespace.
pub static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("url regex"));

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Normalize text: replace URLs with a space, collapse whitespace runs,
/// trim. Idempotent: `clean_text(clean_text(x)) == clean_text(x)`.
pub fn clean_text(s: &str) -> String {
    let out = RE_URL.replace_all(s, " ");
    let out = RE_WS.replace_all(&out, " ");
    out.trim().to_string()
}

/// Truncate to at most `max_chars` characters, appending `…` when anything
/// was cut. Char-based so multi-byte input never splits a boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}
