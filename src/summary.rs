// src/summary.rs
//! Aggregate statistics over one classified batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ScoredPost;

/// Terms kept in the ranked wordfreq artifact.
pub const TOP_TERMS: usize = 150;
/// Terms surfaced inside the summary itself.
pub const SUMMARY_TOP_TERMS: usize = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub subreddit: String,
    pub post_count: usize,
    pub generated_at_utc: String,
    pub avg_sentiment: f64,
    /// Keys "1".."5", always all five, summing to `post_count`.
    pub sentiment_histogram: BTreeMap<String, usize>,
    pub top_requested_items: Vec<TermCount>,
}

/// Slice the ranked table down to the wordfreq artifact.
pub fn top_terms(ranked: Vec<(String, u64)>) -> Vec<TermCount> {
    ranked
        .into_iter()
        .take(TOP_TERMS)
        .map(|(term, count)| TermCount { term, count })
        .collect()
}

/// Mean sentiment rounded to 3 decimals; 0.0 for an empty batch.
pub fn mean_sentiment(scored: &[ScoredPost]) -> f64 {
    if scored.is_empty() {
        return 0.0;
    }
    let sum: i64 = scored.iter().map(|sp| sp.sentiment_1_5 as i64).sum();
    let avg = sum as f64 / scored.len() as f64;
    (avg * 1000.0).round() / 1000.0
}

pub fn build_summary(
    subreddit: &str,
    scored: &[ScoredPost],
    wordfreq: &[TermCount],
    generated_at: DateTime<Utc>,
) -> RunSummary {
    let mut histogram = BTreeMap::new();
    for bucket in 1..=5 {
        let n = scored.iter().filter(|sp| sp.sentiment_1_5 == bucket).count();
        histogram.insert(bucket.to_string(), n);
    }

    RunSummary {
        subreddit: subreddit.to_string(),
        post_count: scored.len(),
        generated_at_utc: generated_at.to_rfc3339(),
        avg_sentiment: mean_sentiment(scored),
        sentiment_histogram: histogram,
        top_requested_items: wordfreq.iter().take(SUMMARY_TOP_TERMS).cloned().collect(),
    }
}
