//! # News Scraper
//!
//! Best-effort scrape of the configured education-news sources: fetch each
//! page once, extract title/summary pairs, keep articles relevant to Indian
//! students studying abroad (with a soft floor before relevance kicks in),
//! and rank India-related articles first.
//!
//! There is no retry, no caching, and no failure path that changes the
//! HTTP-level result: a source that errors out simply contributes nothing.

pub mod extract;
pub mod sources;

use std::cmp::Reverse;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::warn;

use self::extract::RawArticle;
pub use self::sources::{default_sources, NewsSource};

/// Articles matching any of these (against lowercase title+summary) are
/// always kept.
pub const RELEVANCE_KEYWORDS: [&str; 7] = [
    "india",
    "indian",
    "student",
    "visa",
    "scholarship",
    "abroad",
    "international",
];

/// Until this many articles have been collected across all sources,
/// non-matching articles are kept too.
pub const RELEVANCE_FLOOR: usize = 10;

pub const FETCH_TIMEOUT_SECS: u64 = 15;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub source: String,
    pub date_scraped: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsFeed {
    pub status: String,
    pub count: usize,
    pub news: Vec<NewsArticle>,
}

/// Shared outbound client: browser-like User-Agent, fixed per-request
/// timeout.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .context("building scrape http client")
}

/// Run the whole pipeline over `sources`, in order. Always succeeds; a
/// failed source is logged and skipped.
pub async fn scrape_news(client: &reqwest::Client, sources: &[NewsSource]) -> NewsFeed {
    let mut all_news: Vec<NewsArticle> = Vec::new();

    for source in sources {
        match fetch_source(client, source).await {
            Ok(body) => collect_articles(&body, source, &mut all_news),
            Err(e) => warn!(url = source.url, error = ?e, "source fetch failed; skipping"),
        }
    }

    rank_articles(&mut all_news);

    NewsFeed {
        status: "success".to_string(),
        count: all_news.len(),
        news: all_news,
    }
}

async fn fetch_source(client: &reqwest::Client, source: &NewsSource) -> Result<String> {
    let response = client
        .get(source.url)
        .send()
        .await
        .with_context(|| format!("fetching {}", source.url))?
        .error_for_status()
        .with_context(|| format!("non-success status from {}", source.url))?;
    response
        .text()
        .await
        .with_context(|| format!("reading body from {}", source.url))
}

/// Extract, filter, and append one fetched page's articles.
fn collect_articles(body: &str, source: &NewsSource, all_news: &mut Vec<NewsArticle>) {
    let raw = match extract::extract_articles(body, source) {
        Ok(articles) => articles,
        Err(e) => {
            warn!(url = source.url, error = ?e, "extraction failed; skipping source");
            return;
        }
    };

    let host = sources::host_name(source.url);
    for article in raw {
        filter_and_append(article, &host, all_news);
    }
}

/// Keep the article if it matches a relevance keyword, or if the running
/// total across all sources is still below the floor. The floor is global:
/// once 10 articles are collected, only keyword matches get in.
fn filter_and_append(article: RawArticle, host: &str, all_news: &mut Vec<NewsArticle>) {
    let haystack = article_text(&article.title, &article.summary);
    let relevant = RELEVANCE_KEYWORDS.iter().any(|kw| haystack.contains(kw));

    if relevant || all_news.len() < RELEVANCE_FLOOR {
        all_news.push(NewsArticle {
            title: article.title,
            link: article.link,
            summary: article.summary,
            source: host.to_string(),
            date_scraped: Local::now().format("%Y-%m-%d").to_string(),
        });
    }
}

/// Stable sort: articles mentioning "india" first, then within those the
/// ones also mentioning "scholarship"; ties keep their append order.
pub fn rank_articles(news: &mut [NewsArticle]) {
    news.sort_by_key(|article| {
        let text = article_text(&article.title, &article.summary);
        Reverse((text.contains("india"), text.contains("scholarship")))
    });
}

fn article_text(title: &str, summary: &str) -> String {
    format!("{} {}", title, summary).to_lowercase()
}
