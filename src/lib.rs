// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod classify;
pub mod config;
pub mod filter;
pub mod freq;
pub mod normalize;
pub mod output;
pub mod reddit;
pub mod summary;
pub mod types;

// ---- Re-exports for stable public API ----
pub use crate::classify::{score_posts, Classifier, Extraction, OpenAiClassifier};
pub use crate::config::Config;
pub use crate::filter::filter_by_age;
pub use crate::freq::{build_term_freq, FreqWeights, TermCounter, DEFAULT_STOP_WORDS};
pub use crate::reddit::{fetch_new, ListingPage, ListingSource, RedditClient};
pub use crate::summary::{build_summary, top_terms, RunSummary, TermCount};
pub use crate::types::{RawPost, ScoredPost};
