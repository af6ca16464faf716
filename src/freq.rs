// src/freq.rs
//! Term-frequency aggregation: classifier-extracted phrases carry a high
//! weight, raw-text keywords a low one, accumulated into a single counter.
//!
//! The stop-word list and token character whitelist are data, not logic;
//! both are named constants here and every entry point accepts substitutes
//! so tests can run against a different vocabulary.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::RE_URL;
use crate::types::ScoredPost;

/// Minimum surviving term length, in characters.
pub const MIN_TERM_LEN: usize = 3;

/// Relative weights for the two accumulation passes. The 3:1 ratio is a
/// tuning choice carried over from production, not a law; adjust here.
#[derive(Debug, Clone, Copy)]
pub struct FreqWeights {
    /// Weight of one classifier-extracted phrase occurrence.
    pub requested_item: u64,
    /// Weight of one raw-text token occurrence.
    pub token: u64,
}

impl Default for FreqWeights {
    fn default() -> Self {
        Self {
            requested_item: 3,
            token: 1,
        }
    }
}

/// Articles, pronouns, community-generic filler, and politeness words that
/// would otherwise dominate the table.
pub static DEFAULT_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    "the a an and or but if then else when while to of in on for with without is are was were be been being
     i you he she they we it this that these those my your our their
     codm cod mobile call duty callofdutymobile
     pls please thanks thank
     just like game gameplay player players
     really very much"
        .split_whitespace()
        .collect()
});

/// Anything outside lowercase alphanumerics, space, and a few phrase
/// punctuation marks becomes a space before splitting.
static RE_TOKEN_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s\-\+&'/]").expect("token strip regex"));

/// Insertion-ordered counter. Counts live in a map; `order` remembers first
/// occurrence so ranking ties stay stable across runs.
#[derive(Debug, Default)]
pub struct TermCounter {
    counts: HashMap<String, u64>,
    order: Vec<String>,
}

impl TermCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, term: &str, weight: u64) {
        let term = term.trim();
        if term.is_empty() {
            return;
        }
        match self.counts.get_mut(term) {
            Some(c) => *c += weight,
            None => {
                self.counts.insert(term.to_string(), weight);
                self.order.push(term.to_string());
            }
        }
    }

    pub fn get(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Drop every term shorter than `min_len` characters.
    pub fn prune_short(&mut self, min_len: usize) {
        self.order.retain(|t| t.chars().count() >= min_len);
        self.counts.retain(|t, _| t.chars().count() >= min_len);
    }

    /// `(term, count)` pairs sorted by count descending. The sort is stable,
    /// so ties keep first-occurrence order. No ranking happens before this.
    pub fn into_ranked(self) -> Vec<(String, u64)> {
        let TermCounter { counts, order } = self;
        let mut out: Vec<(String, u64)> = order
            .into_iter()
            .filter_map(|t| counts.get(&t).copied().map(|c| (t, c)))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1));
        out
    }
}

/// Tokenize free text for the low-weight pass: lowercase, strip URLs,
/// whitelist characters, split on whitespace, trim quote/hyphen edges, drop
/// short, purely numeric, and stop-listed tokens.
pub fn tokens_from(text: &str, stop_words: &HashSet<&str>) -> Vec<String> {
    let lowered = text.to_lowercase();
    let no_urls = RE_URL.replace_all(&lowered, " ");
    let stripped = RE_TOKEN_STRIP.replace_all(&no_urls, " ");

    let mut out = Vec::new();
    for part in stripped.split_whitespace() {
        let t = part.trim_matches(|c| matches!(c, '-' | '\'' | '"'));
        if t.chars().count() < MIN_TERM_LEN {
            continue;
        }
        if t.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if stop_words.contains(t) {
            continue;
        }
        out.push(t.to_string());
    }
    out
}

/// Merge both passes over the full scored set into one counter.
pub fn build_term_freq(
    scored: &[ScoredPost],
    weights: FreqWeights,
    stop_words: &HashSet<&str>,
) -> TermCounter {
    let mut freq = TermCounter::new();

    // Pass 1: requested items, the strong signal.
    for sp in scored {
        for item in &sp.requested_items {
            freq.add(&item.to_lowercase(), weights.requested_item);
        }
    }

    // Pass 2: lightweight keyword extraction for coverage.
    for sp in scored {
        for t in tokens_from(&sp.title, stop_words) {
            freq.add(&t, weights.token);
        }
        for t in tokens_from(&sp.selftext, stop_words) {
            freq.add(&t, weights.token);
        }
    }

    freq.prune_short(MIN_TERM_LEN);
    freq
}
