// tests/e2e_snapshot.rs
// Full pipeline over stubbed externals: classify -> aggregate -> summarize
// -> write artifacts, checked against known-good numbers.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use codm_sentiment_tracker::{
    build_summary, build_term_freq, filter_by_age, score_posts, top_terms, Classifier,
    FreqWeights, RawPost, DEFAULT_STOP_WORDS,
};
use codm_sentiment_tracker::output::{write_run_outputs, POSTS_FILE, SUMMARY_FILE, WORDFREQ_FILE};

struct StubClassifier;

#[async_trait]
impl Classifier for StubClassifier {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Ok(r#"{"sentiment_1_5":2,"sentiment_reason":"frustrated","requested_items":["XYZ gun nerf"]}"#.to_string())
    }
    fn name(&self) -> &'static str {
        "stub"
    }
}

fn post(id: &str, created: f64) -> RawPost {
    RawPost {
        id: id.into(),
        title: "nerf the XYZ gun".into(),
        selftext: String::new(),
        created_utc: Some(created),
        ..Default::default()
    }
}

#[tokio::test]
async fn three_identical_posts_produce_known_aggregates() {
    let now = 1_700_000_000.0;
    let raw: Vec<RawPost> = (0..3).map(|i| post(&format!("p{i}"), now - 60.0)).collect();

    // Age filter active but permissive: nothing should drop.
    let raw = filter_by_age(raw, Some(24), now);
    assert_eq!(raw.len(), 3);

    let scored = score_posts(&StubClassifier, "test", &raw, Duration::ZERO)
        .await
        .unwrap();

    let freq = build_term_freq(&scored, FreqWeights::default(), &DEFAULT_STOP_WORDS);
    // One phrase occurrence per post at weight 3.
    assert_eq!(freq.get("xyz gun nerf"), 9);

    let wordfreq = top_terms(freq.into_ranked());
    assert_eq!(wordfreq[0].term, "xyz gun nerf");
    assert_eq!(wordfreq[0].count, 9);

    let summary = build_summary("test", &scored, &wordfreq, Utc::now());
    assert_eq!(summary.post_count, 3);
    assert_eq!(summary.avg_sentiment, 2.0);
    assert_eq!(summary.sentiment_histogram["1"], 0);
    assert_eq!(summary.sentiment_histogram["2"], 3);
    assert_eq!(summary.sentiment_histogram["3"], 0);
    assert_eq!(summary.sentiment_histogram["4"], 0);
    assert_eq!(summary.sentiment_histogram["5"], 0);
    assert_eq!(summary.top_requested_items[0].term, "xyz gun nerf");

    // Artifacts land on disk and parse back.
    let dir = tempfile::tempdir().unwrap();
    write_run_outputs(dir.path(), &scored, &wordfreq, &summary).unwrap();

    let posts: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(POSTS_FILE)).unwrap())
            .unwrap();
    assert_eq!(posts.as_array().unwrap().len(), 3);
    assert!(posts[0]["created_iso"].as_str().unwrap().starts_with("2023-"));

    let wf: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(WORDFREQ_FILE)).unwrap())
            .unwrap();
    assert_eq!(wf[0]["term"], "xyz gun nerf");
    assert_eq!(wf[0]["count"], 9);

    let sum: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap())
            .unwrap();
    assert_eq!(sum["post_count"], 3);
    assert_eq!(sum["avg_sentiment"], 2.0);
}

#[tokio::test]
async fn stale_posts_are_filtered_before_classification() {
    let now = 1_700_000_000.0;
    let fresh = post("fresh", now - 3600.0);
    let stale = post("stale", now - 48.0 * 3600.0);
    let kept = filter_by_age(vec![stale, fresh], Some(24), now);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "fresh");
}
