// src/classify.rs
//! Per-post sentiment classification via an external LLM endpoint.
//!
//! The service's reply is free text that *should* contain a JSON object, so
//! response handling is modeled as an explicit three-stage extraction
//! ([`Extraction`]) with a neutral fallback per stage. A malformed reply
//! degrades that one post to defaults; it never aborts the batch. Transport
//! errors do abort — there is no per-post retry or skip.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::{clean_text, truncate_chars};
use crate::types::{RawPost, ScoredPost};

/// Body text sent to the classifier is capped to keep request cost bounded.
pub const MAX_BODY_CHARS: usize = 1200;

/// Sentiment used whenever the classifier's reply cannot be trusted.
pub const NEUTRAL_SENTIMENT: i32 = 3;

pub const MAX_REASON_CHARS: usize = 200;
pub const MAX_ITEMS: usize = 5;
pub const MAX_ITEM_CHARS: usize = 60;

/// Pause after each classification call.
pub const CLASSIFY_DELAY: Duration = Duration::from_millis(200);

const SYSTEM_INSTRUCTION: &str = "You are an analyst for a mobile game community. \
Given a Reddit post, output STRICT JSON with keys: \
sentiment_1_5 (integer 1..5), sentiment_reason (<=20 words), \
requested_items (array of 0..5 short phrases). \
Requested items = content the author is asking for (buff/nerf/add/remove/fix), \
or the main items being discussed (maps, guns, operators, perks, modes, bugs). \
If unclear, return an empty array for requested_items.";

/// Raw-text completion seam. Production uses [`OpenAiClassifier`]; tests
/// substitute canned replies.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Send one (system, user) exchange and return the raw response text.
    /// Transport/service failures are errors and abort the run.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

pub struct OpenAiClassifier {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("codm-sentiment-tracker/1.0")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building openai http client")?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let req = Req {
            model: &self.model,
            messages: vec![
                Msg {
                    role: "system",
                    content: system,
                },
                Msg {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
            max_tokens: 250,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .context("classifier POST")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!("classifier returned HTTP {status}"));
        }

        let body: Resp = resp.json().await.context("classifier body")?;
        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

/// Outcome of digging a JSON object out of the classifier's reply text.
/// Each variant's fallback values are spelled out in [`Extraction::into_fields`]
/// rather than hidden in nested error handling.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// No `{...}` substring in the reply at all.
    NoJsonFound,
    /// A candidate substring existed but was not valid JSON.
    ParseFailed,
    Valid {
        sentiment: i32,
        reason: String,
        items: Vec<String>,
    },
}

impl Extraction {
    /// Collapse to the final `(sentiment, reason, requested_items)` triple.
    pub fn into_fields(self) -> (i32, String, Vec<String>) {
        match self {
            Extraction::NoJsonFound => (NEUTRAL_SENTIMENT, "no JSON parsed".to_string(), vec![]),
            Extraction::ParseFailed => (NEUTRAL_SENTIMENT, "parse error".to_string(), vec![]),
            Extraction::Valid {
                sentiment,
                reason,
                items,
            } => (sentiment, reason, items),
        }
    }
}

/// Locate and validate the embedded JSON object in a raw classifier reply.
pub fn extract_classification(raw: &str) -> Extraction {
    // Greedy span: first '{' through last '}'. The service wraps its JSON in
    // prose often enough that bare parsing is not an option.
    let (start, end) = match (raw.find('{'), raw.rfind('}')) {
        (Some(s), Some(e)) if s < e => (s, e),
        _ => return Extraction::NoJsonFound,
    };

    let obj: serde_json::Value = match serde_json::from_str(&raw[start..=end]) {
        Ok(v) => v,
        Err(_) => return Extraction::ParseFailed,
    };

    let sentiment = coerce_int(obj.get("sentiment_1_5"), NEUTRAL_SENTIMENT).clamp(1, 5);

    let reason = obj
        .get("sentiment_reason")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .trim()
        .chars()
        .take(MAX_REASON_CHARS)
        .collect::<String>();

    let items = match obj.get("requested_items").and_then(|v| v.as_array()) {
        Some(arr) => sanitize_items(arr),
        None => vec![],
    };

    Extraction::Valid {
        sentiment,
        reason,
        items,
    }
}

/// Characters allowed inside a requested-item phrase: word chars,
/// whitespace, hyphen, plus, ampersand, apostrophe, slash.
static RE_ITEM_STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s\-\+&'/]").expect("item strip regex"));

fn sanitize_items(arr: &[serde_json::Value]) -> Vec<String> {
    let mut out = Vec::new();
    for v in arr.iter().take(MAX_ITEMS) {
        let s = match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        };
        let cleaned = clean_text(&s);
        let stripped = RE_ITEM_STRIP.replace_all(&cleaned, "").trim().to_string();
        if stripped.is_empty() {
            continue;
        }
        out.push(stripped.chars().take(MAX_ITEM_CHARS).collect());
    }
    out
}

fn coerce_int(v: Option<&serde_json::Value>, default: i32) -> i32 {
    let Some(v) = v else { return default };
    if let Some(i) = v.as_i64() {
        return i32::try_from(i).unwrap_or(default);
    }
    if let Some(f) = v.as_f64() {
        return f as i32;
    }
    if let Some(s) = v.as_str() {
        if let Ok(i) = s.trim().parse::<i32>() {
            return i;
        }
    }
    default
}

/// Classify every post, one call per post with fixed pacing in between.
/// Malformed replies degrade that post to neutral defaults; a failed call
/// aborts the whole batch.
pub async fn score_posts(
    classifier: &dyn Classifier,
    subreddit: &str,
    posts: &[RawPost],
    pace: Duration,
) -> Result<Vec<ScoredPost>> {
    let mut scored = Vec::with_capacity(posts.len());

    for p in posts {
        let title = clean_text(&p.title);
        let body = truncate_chars(&clean_text(&p.selftext), MAX_BODY_CHARS);

        let prompt = serde_json::json!({
            "subreddit": subreddit,
            "title": title,
            "body": body,
        });
        let user = serde_json::to_string(&prompt).context("encoding prompt payload")?;

        let raw = classifier
            .complete(SYSTEM_INSTRUCTION, &user)
            .await
            .with_context(|| format!("classifying post {}", p.id))?;

        let (sentiment, reason, items) = extract_classification(&raw).into_fields();

        scored.push(ScoredPost {
            id: p.id.clone(),
            title,
            selftext: body,
            url: p.url.clone(),
            permalink: format!("https://www.reddit.com{}", p.permalink),
            author: p.author.clone(),
            created_utc: p.created_utc.unwrap_or(0.0),
            num_comments: p.num_comments,
            score: p.score,
            sentiment_1_5: sentiment,
            sentiment_reason: reason,
            requested_items: items,
        });

        // gentle pacing against the API
        tokio::time::sleep(pace).await;
    }

    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_without_braces_falls_back_to_neutral() {
        let (s, reason, items) = extract_classification("I cannot help with that.").into_fields();
        assert_eq!(s, NEUTRAL_SENTIMENT);
        assert_eq!(reason, "no JSON parsed");
        assert!(items.is_empty());
    }

    #[test]
    fn invalid_json_between_braces_is_parse_error() {
        let (s, reason, items) = extract_classification("here you go {not json}").into_fields();
        assert_eq!(s, NEUTRAL_SENTIMENT);
        assert_eq!(reason, "parse error");
        assert!(items.is_empty());
    }

    #[test]
    fn valid_json_survives_surrounding_prose() {
        let raw = r#"Sure! {"sentiment_1_5": 4, "sentiment_reason": "happy", "requested_items": ["new map"]} done"#;
        let (s, reason, items) = extract_classification(raw).into_fields();
        assert_eq!(s, 4);
        assert_eq!(reason, "happy");
        assert_eq!(items, vec!["new map"]);
    }

    #[test]
    fn sentiment_is_clamped_and_coerced() {
        for (raw, want) in [
            (r#"{"sentiment_1_5": 9}"#, 5),
            (r#"{"sentiment_1_5": -2}"#, 1),
            (r#"{"sentiment_1_5": "2"}"#, 2),
            (r#"{"sentiment_1_5": 3.7}"#, 3),
            (r#"{"sentiment_1_5": {"nested": true}}"#, 3),
            (r#"{"no_sentiment": 1}"#, 3),
        ] {
            let (s, _, _) = extract_classification(raw).into_fields();
            assert_eq!(s, want, "input: {raw}");
        }
    }

    #[test]
    fn items_are_capped_sanitized_and_truncated() {
        let raw = r#"{"sentiment_1_5": 3, "sentiment_reason": "", "requested_items":
            ["one", "two", "three", "four", "five", "six"]}"#;
        let (_, _, items) = extract_classification(raw).into_fields();
        assert_eq!(items.len(), MAX_ITEMS);

        let raw = format!(
            r#"{{"sentiment_1_5": 3, "requested_items": ["{}", "!!!", "ak-47 buff?"]}}"#,
            "x".repeat(80)
        );
        let (_, _, items) = extract_classification(&raw).into_fields();
        // 80 x's truncated, "!!!" strips to empty and is dropped,
        // "?" stripped from the third entry.
        assert_eq!(items, vec!["x".repeat(MAX_ITEM_CHARS), "ak-47 buff".to_string()]);
    }

    #[test]
    fn non_array_requested_items_becomes_empty() {
        let raw = r#"{"sentiment_1_5": 2, "requested_items": "not a list"}"#;
        let (_, _, items) = extract_classification(raw).into_fields();
        assert!(items.is_empty());
    }

    #[test]
    fn reason_is_trimmed_and_capped() {
        let long = "r".repeat(500);
        let raw = format!(r#"{{"sentiment_1_5": 3, "sentiment_reason": "  {long}  "}}"#);
        let (_, reason, _) = extract_classification(&raw).into_fields();
        assert_eq!(reason.chars().count(), MAX_REASON_CHARS);
    }
}
