// src/types.rs
use serde::{Deserialize, Serialize};

/// One post record as it appears under `data.children[].data` in a Reddit
/// listing. Unknown fields are ignored; missing numeric fields default to 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawPost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub author: String,
    /// Unix seconds. Reddit sends this as a float; absent on a few
    /// synthetic records, hence the Option.
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub score: i64,
}

/// A post after classification. Created exactly once per `RawPost`;
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredPost {
    pub id: String,
    pub title: String,
    pub selftext: String,
    pub url: String,
    /// Full URL (the listing only carries the path fragment).
    pub permalink: String,
    pub author: String,
    pub created_utc: f64,
    pub num_comments: i64,
    pub score: i64,
    /// Always within 1..=5, whatever the classifier returned.
    pub sentiment_1_5: i32,
    pub sentiment_reason: String,
    /// At most 5 entries, each at most 60 chars, sanitized.
    pub requested_items: Vec<String>,
}
