// src/output.rs
//! JSON artifact writing. Each artifact is written whole via a temp file
//! and rename, creating parent directories as needed and replacing any
//! previous run's file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::summary::{RunSummary, TermCount};
use crate::types::ScoredPost;

pub const POSTS_FILE: &str = "posts.json";
pub const WORDFREQ_FILE: &str = "wordfreq.json";
pub const SUMMARY_FILE: &str = "summary.json";

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(value).context("serializing output json")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming into {}", path.display()))?;
    Ok(())
}

/// Scored posts with a human-readable ISO-8601 timestamp added.
fn posts_payload(scored: &[ScoredPost]) -> Vec<serde_json::Value> {
    scored
        .iter()
        .map(|sp| {
            let created_iso = DateTime::<Utc>::from_timestamp(sp.created_utc as i64, 0)
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default();
            json!({
                "id": sp.id,
                "title": sp.title,
                "selftext": sp.selftext,
                "url": sp.url,
                "permalink": sp.permalink,
                "author": sp.author,
                "created_utc": sp.created_utc,
                "created_iso": created_iso,
                "num_comments": sp.num_comments,
                "score": sp.score,
                "sentiment_1_5": sp.sentiment_1_5,
                "sentiment_reason": sp.sentiment_reason,
                "requested_items": sp.requested_items,
            })
        })
        .collect()
}

/// Write the three run artifacts into `dir`.
pub fn write_run_outputs(
    dir: &Path,
    scored: &[ScoredPost],
    wordfreq: &[TermCount],
    summary: &RunSummary,
) -> Result<()> {
    write_json(&dir.join(POSTS_FILE), &posts_payload(scored))?;
    write_json(&dir.join(WORDFREQ_FILE), &wordfreq)?;
    write_json(&dir.join(SUMMARY_FILE), summary)?;
    Ok(())
}
