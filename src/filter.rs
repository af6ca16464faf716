// src/filter.rs
//! Drops fetched posts older than a configurable horizon.

use crate::types::RawPost;

/// Keep posts created within the last `max_age_hours` relative to
/// `now_unix`. `None` disables filtering (input returned unchanged).
/// Posts without a creation timestamp are dropped when filtering is active.
/// Order-preserving.
pub fn filter_by_age(posts: Vec<RawPost>, max_age_hours: Option<u64>, now_unix: f64) -> Vec<RawPost> {
    let Some(hours) = max_age_hours else {
        return posts;
    };
    let cutoff = now_unix - (hours as f64) * 3600.0;
    posts
        .into_iter()
        .filter(|p| matches!(p.created_utc, Some(ts) if ts >= cutoff))
        .collect()
}
