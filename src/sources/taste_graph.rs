// src/sources/taste_graph.rs
//! Taste-graph collaborator: destination affinities and creator lookups from
//! a cultural-recommendation API.
//!
//! Response shapes vary between API versions, so the wire models are tolerant:
//! every field defaults, the envelope is an untagged enum, and numbers that
//! sometimes arrive as strings are accepted.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::ServiceConfig;

/// One entity returned by the graph: a destination-like record with optional
/// affinity from the query block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphEntity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<EntityTag>,
    #[serde(default)]
    pub popularity: Option<f32>,
    #[serde(default)]
    pub query: EntityQuery,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityTag {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityQuery {
    #[serde(default)]
    pub affinity: Option<f32>,
}

impl GraphEntity {
    /// Affinity with popularity as the fallback signal.
    pub fn affinity_or_popularity(&self) -> Option<f32> {
        self.query.affinity.or(self.popularity)
    }
}

/// A creator-like entity from the graph's person/brand lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphCreator {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "audience_size", alias = "followers")]
    pub audience: Option<u64>,
}

/// Envelope variants observed in the wild: `{"results": {"entities": [...]}}`
/// and the flat `{"entities": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphResponseAny {
    Wrapped { results: EntityBlock },
    Flat { entities: Vec<GraphEntity> },
}

#[derive(Debug, Deserialize)]
struct EntityBlock {
    #[serde(default)]
    entities: Vec<GraphEntity>,
}

impl GraphResponseAny {
    fn into_entities(self) -> Vec<GraphEntity> {
        match self {
            GraphResponseAny::Wrapped { results } => results.entities,
            GraphResponseAny::Flat { entities } => entities,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CreatorResponseAny {
    Wrapped { results: CreatorBlock },
    Flat { entities: Vec<GraphCreator> },
}

#[derive(Debug, Deserialize)]
struct CreatorBlock {
    #[serde(default)]
    entities: Vec<GraphCreator>,
}

impl CreatorResponseAny {
    fn into_creators(self) -> Vec<GraphCreator> {
        match self {
            CreatorResponseAny::Wrapped { results } => results.entities,
            CreatorResponseAny::Flat { entities } => entities,
        }
    }
}

#[async_trait]
pub trait TasteGraphClient: Send + Sync {
    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
    /// False routes the pipeline straight to local scoring, no call attempted.
    fn configured(&self) -> bool;
    /// Destination entities ranked by affinity for the given interest tags.
    async fn destination_affinities(
        &self,
        interests: &[String],
        take: usize,
    ) -> Result<Vec<GraphEntity>>;
    /// Creator entities active around a destination, interest-filtered.
    async fn creators_for(&self, destination: &str, interests: &[String])
        -> Result<Vec<GraphCreator>>;
}

/// Used when no key is configured.
pub struct DisabledTasteGraph;

#[async_trait]
impl TasteGraphClient for DisabledTasteGraph {
    fn name(&self) -> &'static str {
        "disabled"
    }
    fn configured(&self) -> bool {
        false
    }
    async fn destination_affinities(
        &self,
        _interests: &[String],
        _take: usize,
    ) -> Result<Vec<GraphEntity>> {
        bail!("taste graph not configured")
    }
    async fn creators_for(
        &self,
        _destination: &str,
        _interests: &[String],
    ) -> Result<Vec<GraphCreator>> {
        bail!("taste graph not configured")
    }
}

/// Deterministic mock for tests and local runs.
#[derive(Default, Clone)]
pub struct MockTasteGraph {
    pub entities: Vec<(String, f32)>,
    pub creators: Vec<(String, u64)>,
    /// When set, every call fails; exercises the degraded path.
    pub failing: bool,
}

#[async_trait]
impl TasteGraphClient for MockTasteGraph {
    fn name(&self) -> &'static str {
        "mock"
    }
    fn configured(&self) -> bool {
        true
    }
    async fn destination_affinities(
        &self,
        _interests: &[String],
        take: usize,
    ) -> Result<Vec<GraphEntity>> {
        if self.failing {
            bail!("mock taste graph set to fail");
        }
        Ok(self
            .entities
            .iter()
            .take(take)
            .map(|(name, affinity)| GraphEntity {
                name: name.clone(),
                query: EntityQuery {
                    affinity: Some(*affinity),
                },
                ..Default::default()
            })
            .collect())
    }
    async fn creators_for(
        &self,
        _destination: &str,
        _interests: &[String],
    ) -> Result<Vec<GraphCreator>> {
        if self.failing {
            bail!("mock taste graph set to fail");
        }
        Ok(self
            .creators
            .iter()
            .map(|(name, audience)| GraphCreator {
                name: name.clone(),
                audience: Some(*audience),
            })
            .collect())
    }
}

pub struct HttpTasteGraph {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTasteGraph {
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
impl TasteGraphClient for HttpTasteGraph {
    fn name(&self) -> &'static str {
        "qloo"
    }
    fn configured(&self) -> bool {
        !self.api_key.is_empty() && !self.base_url.is_empty()
    }

    async fn destination_affinities(
        &self,
        interests: &[String],
        take: usize,
    ) -> Result<Vec<GraphEntity>> {
        if !self.configured() {
            bail!("taste graph missing key or base url");
        }
        let url = format!("{}/v2/insights", self.base_url);
        let tags = interests.join(",");
        let take_s = take.to_string();
        let resp = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[
                ("filter.type", "urn:entity:destination"),
                ("signal.interests.tags", tags.as_str()),
                ("take", take_s.as_str()),
            ])
            .send()
            .await
            .context("taste graph request failed")?;
        if !resp.status().is_success() {
            bail!("taste graph returned {}", resp.status());
        }
        let body: GraphResponseAny = resp.json().await.context("taste graph body unreadable")?;
        Ok(body.into_entities())
    }

    async fn creators_for(
        &self,
        destination: &str,
        interests: &[String],
    ) -> Result<Vec<GraphCreator>> {
        if !self.configured() {
            bail!("taste graph missing key or base url");
        }
        let url = format!("{}/v2/insights", self.base_url);
        let tags = interests.join(",");
        let resp = self
            .http
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(&[
                ("filter.type", "urn:entity:person"),
                ("filter.location.query", destination),
                ("signal.interests.tags", tags.as_str()),
            ])
            .send()
            .await
            .context("taste graph creator request failed")?;
        if !resp.status().is_success() {
            bail!("taste graph returned {}", resp.status());
        }
        let body: CreatorResponseAny =
            resp.json().await.context("taste graph body unreadable")?;
        Ok(body.into_creators())
    }
}
