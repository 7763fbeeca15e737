// src/sources/channel_search.rs
//! Channel-search collaborator: finds creator channels publishing about a
//! destination. Subscriber counts arrive as numbers or strings depending on
//! the backing API, so the count field is duck-typed.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use strsim::normalized_levenshtein;

use crate::config::ServiceConfig;

/// Channels below this audience size are discarded before any counting.
pub const MIN_AUDIENCE: u64 = 1_000;

/// Titles at or above this similarity are treated as the same channel listed
/// twice.
const DUPLICATE_SIMILARITY: f64 = 0.9;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Channel {
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default, alias = "subscriberCount", alias = "subscribers")]
    count: CountAny,
    #[serde(default)]
    pub url: Option<String>,
}

impl Channel {
    pub fn subscribers(&self) -> u64 {
        self.count.as_u64()
    }

    #[cfg(test)]
    pub fn test_new(name: &str, subscribers: u64) -> Self {
        Self {
            name: name.to_string(),
            count: CountAny::Num(subscribers),
            url: None,
        }
    }
}

/// Subscriber counts come back as `12000`, `"12000"` or are absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountAny {
    Num(u64),
    Text(String),
    Absent(Option<()>),
}

impl Default for CountAny {
    fn default() -> Self {
        CountAny::Absent(None)
    }
}

impl CountAny {
    fn as_u64(&self) -> u64 {
        match self {
            CountAny::Num(n) => *n,
            CountAny::Text(s) => s.trim().replace(',', "").parse().unwrap_or(0),
            CountAny::Absent(_) => 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Channel>,
}

#[async_trait]
pub trait ChannelSearchClient: Send + Sync {
    fn name(&self) -> &'static str;
    fn configured(&self) -> bool;
    /// Raw search results; callers filter and dedupe.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Channel>>;
}

/// Drop sub-minimum channels, collapse near-duplicate titles (keeping the
/// larger audience) and sort by audience descending.
pub fn viable_channels(mut channels: Vec<Channel>) -> Vec<Channel> {
    channels.retain(|c| c.subscribers() >= MIN_AUDIENCE && !c.name.trim().is_empty());
    channels.sort_by(|a, b| b.subscribers().cmp(&a.subscribers()));

    let mut kept: Vec<Channel> = Vec::with_capacity(channels.len());
    for candidate in channels {
        let duplicate = kept.iter().any(|k| {
            normalized_levenshtein(&k.name.to_lowercase(), &candidate.name.to_lowercase())
                >= DUPLICATE_SIMILARITY
        });
        if !duplicate {
            kept.push(candidate);
        }
    }
    kept
}

pub struct DisabledChannelSearch;

#[async_trait]
impl ChannelSearchClient for DisabledChannelSearch {
    fn name(&self) -> &'static str {
        "disabled"
    }
    fn configured(&self) -> bool {
        false
    }
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<Channel>> {
        bail!("channel search not configured")
    }
}

#[derive(Default, Clone)]
pub struct MockChannelSearch {
    pub channels: Vec<(String, u64)>,
    pub failing: bool,
}

#[async_trait]
impl ChannelSearchClient for MockChannelSearch {
    fn name(&self) -> &'static str {
        "mock"
    }
    fn configured(&self) -> bool {
        true
    }
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<Channel>> {
        if self.failing {
            bail!("mock channel search set to fail");
        }
        Ok(self
            .channels
            .iter()
            .take(limit)
            .map(|(name, subs)| Channel {
                name: name.clone(),
                count: CountAny::Num(*subs),
                url: None,
            })
            .collect())
    }
}

pub struct HttpChannelSearch {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpChannelSearch {
    pub fn new(cfg: &ServiceConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("wandermatch/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[async_trait]
impl ChannelSearchClient for HttpChannelSearch {
    fn name(&self) -> &'static str {
        "http"
    }
    fn configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Channel>> {
        if !self.configured() {
            bail!("channel search missing key or base url");
        }
        let url = format!("{}/search", self.base_url);
        let max_results = limit.to_string();
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("type", "channel"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("channel search request failed")?;
        if !resp.status().is_success() {
            bail!("channel search returned {}", resp.status());
        }
        let body: SearchResponse = resp.json().await.context("channel search body unreadable")?;
        Ok(body.items)
    }
}
