// src/reddit.rs
//! Listing fetcher: paginates a subreddit's public `new` listing until a
//! target number of posts is collected or the source is exhausted.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::types::RawPost;

const UA: &str = "codm-sentiment-tracker/1.0 (github-pages; contact: you@example.com)";

/// Reddit caps listing pages at 100 items.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Pause between listing-page requests. Pacing only, not a correctness
/// mechanism.
pub const PAGE_DELAY: Duration = Duration::from_secs(1);

/// One page of a listing plus the cursor for the next one.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub posts: Vec<RawPost>,
    /// `None` when the source reports no further page.
    pub after: Option<String>,
}

/// Source of listing pages. Production uses [`RedditClient`]; tests
/// substitute scripted pages.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_page(&self, after: Option<&str>, limit: u32) -> Result<ListingPage>;
    fn name(&self) -> &'static str;
}

// Wire shape of the listing endpoint body: `data.children[].data` records
// plus a `data.after` cursor (null when exhausted).
#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    data: ListingData,
}

#[derive(Debug, Default, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
    #[serde(default)]
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Child {
    #[serde(default)]
    data: RawPost,
}

pub struct RedditClient {
    http: reqwest::Client,
    base_url: String,
}

impl RedditClient {
    pub fn new(subreddit: &str) -> Result<Self> {
        Self::with_base_url(format!("https://www.reddit.com/r/{subreddit}/new.json"))
    }

    /// Point the client at an arbitrary listing URL (local test servers).
    pub fn with_base_url(base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(UA)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .context("building reddit http client")?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl ListingSource for RedditClient {
    async fn fetch_page(&self, after: Option<&str>, limit: u32) -> Result<ListingPage> {
        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(cursor) = after {
            params.push(("after", cursor.to_string()));
        }

        let resp = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .context("reddit listing GET")?
            .error_for_status()
            .context("reddit listing status")?;

        let listing: Listing = resp.json().await.context("reddit listing body")?;
        Ok(ListingPage {
            posts: listing.data.children.into_iter().map(|c| c.data).collect(),
            after: listing.data.after,
        })
    }

    fn name(&self) -> &'static str {
        "reddit-new"
    }
}

/// Collect up to `target_count` newest posts, paging with the server-supplied
/// cursor. Stops on an empty page or a missing cursor; a failed page request
/// aborts the whole fetch. Never returns more than `target_count` posts.
pub async fn fetch_new(
    source: &dyn ListingSource,
    target_count: usize,
    page_delay: Duration,
) -> Result<Vec<RawPost>> {
    let mut posts: Vec<RawPost> = Vec::with_capacity(target_count);
    let mut after: Option<String> = None;

    while posts.len() < target_count {
        let remaining = (target_count - posts.len()) as u32;
        let page_limit = remaining.min(MAX_PAGE_LIMIT);

        let page = source.fetch_page(after.as_deref(), page_limit).await?;
        if page.posts.is_empty() {
            break;
        }
        posts.extend(page.posts);

        after = page.after;
        if after.is_none() {
            break;
        }

        // be gentle with the upstream
        tokio::time::sleep(page_delay).await;
    }

    posts.truncate(target_count);
    Ok(posts)
}
