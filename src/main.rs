//! Sentiment tracker — binary entrypoint.
//! One linear pass per invocation: fetch newest posts, filter by age,
//! classify each post, aggregate term frequencies, write the three JSON
//! artifacts. Designed to run from a scheduler (GitHub Actions) or locally.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use codm_sentiment_tracker::{
    build_summary, build_term_freq, fetch_new, filter_by_age, score_posts, top_terms, Config,
    FreqWeights, OpenAiClassifier, RedditClient, DEFAULT_STOP_WORDS,
};
use codm_sentiment_tracker::classify::CLASSIFY_DELAY;
use codm_sentiment_tracker::output::write_run_outputs;
use codm_sentiment_tracker::reddit::PAGE_DELAY;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when the environment is passed directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .compact()
        .init();

    // Fatal before any network call if the credential is missing.
    let cfg = Config::from_env()?;

    info!(subreddit = %cfg.subreddit, limit = cfg.post_limit, "fetching newest posts");
    let client = RedditClient::new(&cfg.subreddit)?;
    let raw = fetch_new(&client, cfg.post_limit, PAGE_DELAY).await?;

    let now = Utc::now();
    let raw = filter_by_age(raw, cfg.max_age_hours, now.timestamp() as f64);
    info!(count = raw.len(), "posts remaining after filters");

    info!(model = %cfg.openai_model, "scoring sentiment and extracting requested items");
    let classifier = OpenAiClassifier::new(cfg.openai_api_key.clone(), cfg.openai_model.clone())?;
    let scored = score_posts(&classifier, &cfg.subreddit, &raw, CLASSIFY_DELAY).await?;

    let freq = build_term_freq(&scored, FreqWeights::default(), &DEFAULT_STOP_WORDS);
    let wordfreq = top_terms(freq.into_ranked());
    let summary = build_summary(&cfg.subreddit, &scored, &wordfreq, Utc::now());

    let out_dir = Path::new(&cfg.output_dir);
    write_run_outputs(out_dir, &scored, &wordfreq, &summary)?;
    info!(
        dir = %out_dir.display(),
        posts = scored.len(),
        terms = wordfreq.len(),
        "wrote posts.json, wordfreq.json, summary.json"
    );

    Ok(())
}
