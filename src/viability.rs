// src/viability.rs
//! Creator-community viability gate.
//!
//! Answers one question per destination: are enough creators already active
//! there to sustain community content? Data tiers are tried in order of
//! trustworthiness and each is attempted only while the count is still below
//! the threshold. This function never fails; every tier's own error is
//! absorbed, logged and counted, and the worst case is an `insufficient`
//! record the pipeline then drops.

use metrics::counter;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::Destination;
use crate::sources::channel_search::{viable_channels, Channel};
use crate::sources::Collaborators;
use crate::taste::taxonomy::Taxonomy;

/// Destinations need at least this many active creators to be recommended.
pub const MINIMUM_THRESHOLD: u32 = 10;

/// An estimate that clears this bar gets floored up to the threshold; below
/// it the estimate is left as-is and the destination stays insufficient.
const SECONDARY_BAR: u32 = 8;

const REPRESENTATIVE_LIMIT: usize = 3;
const CHANNEL_RESULT_LIMIT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
    QlooApi,
    SocialApis,
    Estimated,
    Insufficient,
}

impl DataSource {
    fn counter_name(self) -> &'static str {
        match self {
            DataSource::QlooApi => "viability_qloo_total",
            DataSource::SocialApis => "viability_social_total",
            DataSource::Estimated => "viability_estimated_total",
            DataSource::Insufficient => "viability_insufficient_total",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeCreator {
    pub name: String,
    pub audience: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorCommunityRecord {
    pub total_active_creators: u32,
    pub representative_creators: Vec<RepresentativeCreator>,
    pub data_source: DataSource,
    pub minimum_threshold: u32,
}

impl CreatorCommunityRecord {
    fn new(total: u32, reps: Vec<RepresentativeCreator>, source: DataSource) -> Self {
        counter!(source.counter_name()).increment(1);
        Self {
            total_active_creators: total,
            representative_creators: reps,
            data_source: source,
            minimum_threshold: MINIMUM_THRESHOLD,
        }
    }
}

pub fn should_recommend(record: &CreatorCommunityRecord) -> bool {
    record.total_active_creators >= MINIMUM_THRESHOLD
}

/// Resolve the creator community for one destination. Tier order:
/// taste graph, channel search, local estimate, insufficient.
pub async fn creator_community(
    dest: &Destination,
    themes: &[String],
    content_type: Option<&str>,
    clients: &Collaborators,
) -> CreatorCommunityRecord {
    let interests = interest_terms(themes, content_type);
    let mut best_below: u32 = 0;

    // Tier 1: taste-graph creator lookup.
    if clients.taste_graph.configured() {
        match clients.taste_graph.creators_for(&dest.name, &interests).await {
            Ok(creators) => {
                let total = creators.len() as u32;
                if total >= MINIMUM_THRESHOLD {
                    let mut reps: Vec<RepresentativeCreator> = creators
                        .into_iter()
                        .filter(|c| !c.name.trim().is_empty())
                        .map(|c| RepresentativeCreator {
                            name: c.name,
                            audience: c.audience.unwrap_or(0),
                        })
                        .collect();
                    reps.sort_by(|a, b| b.audience.cmp(&a.audience));
                    reps.truncate(REPRESENTATIVE_LIMIT);
                    return CreatorCommunityRecord::new(total, reps, DataSource::QlooApi);
                }
                best_below = best_below.max(total);
            }
            Err(e) => {
                warn!(dest = %dest.id, error = %e, "taste-graph creator lookup failed");
                counter!("viability_tier_errors_total").increment(1);
            }
        }
    } else {
        debug!(dest = %dest.id, "taste graph not configured, skipping tier");
    }

    // Tier 2: channel search across destination + theme queries.
    if clients.channels.configured() {
        match search_channels(dest, themes, clients).await {
            Ok(channels) => {
                let total = channels.len() as u32;
                if total >= MINIMUM_THRESHOLD {
                    let reps = channels
                        .into_iter()
                        .take(REPRESENTATIVE_LIMIT)
                        .map(|c| RepresentativeCreator {
                            audience: c.subscribers(),
                            name: c.name,
                        })
                        .collect();
                    return CreatorCommunityRecord::new(total, reps, DataSource::SocialApis);
                }
                best_below = best_below.max(total);
            }
            Err(e) => {
                warn!(dest = %dest.id, error = %e, "channel search failed");
                counter!("viability_tier_errors_total").increment(1);
            }
        }
    }

    // Tier 3: catalogue-based estimate.
    let estimate = estimate_creators(dest, themes);
    if estimate >= SECONDARY_BAR {
        let total = estimate.max(MINIMUM_THRESHOLD);
        return CreatorCommunityRecord::new(
            total,
            synthesized_representatives(dest),
            DataSource::Estimated,
        );
    }
    best_below = best_below.max(estimate);

    CreatorCommunityRecord::new(best_below, Vec::new(), DataSource::Insufficient)
}

/// Lowercased themes plus the content type, deduplicated, for interest
/// filtering.
fn interest_terms(themes: &[String], content_type: Option<&str>) -> Vec<String> {
    let mut terms: Vec<String> = themes.iter().map(|t| t.trim().to_lowercase()).collect();
    if let Some(ct) = content_type {
        terms.push(ct.trim().to_lowercase());
    }
    terms.retain(|t| !t.is_empty());
    terms.dedup();
    terms
}

async fn search_channels(
    dest: &Destination,
    themes: &[String],
    clients: &Collaborators,
) -> anyhow::Result<Vec<Channel>> {
    let mut queries = vec![format!("{} travel", dest.name)];
    for theme in themes.iter().take(2) {
        queries.push(format!("{} {}", dest.name, theme));
    }

    let mut all = Vec::new();
    for q in &queries {
        let mut found = clients.channels.search(q, CHANNEL_RESULT_LIMIT).await?;
        all.append(&mut found);
    }
    Ok(viable_channels(all))
}

/// Heuristic tier: catalogue baseline scaled by theme affinity and
/// popularity.
fn estimate_creators(dest: &Destination, themes: &[String]) -> u32 {
    let base = if dest.base_creators > 0 {
        dest.base_creators
    } else {
        country_baseline(&dest.country)
    };

    let taxonomy = Taxonomy::global();
    let theme_hits_any = |ids: &[&str]| {
        themes.iter().any(|t| {
            taxonomy
                .matching_categories(t)
                .iter()
                .any(|c| ids.contains(&c.id.as_str()))
        })
    };

    let theme_multiplier = if themes.is_empty() {
        1.0
    } else if theme_hits_any(&["adventure", "food", "nature", "photography", "luxury"]) {
        1.2
    } else if theme_hits_any(&["business"]) {
        0.9
    } else {
        1.0
    };

    let popularity_factor = 0.5 + dest.popularity;
    (base as f32 * theme_multiplier * popularity_factor).round() as u32
}

/// Fallback baseline for catalogue rows without their own creator count.
fn country_baseline(country: &str) -> u32 {
    match country.to_lowercase().as_str() {
        "united states" | "japan" | "spain" | "france" | "italy" => 30,
        "thailand" | "indonesia" | "mexico" | "portugal" => 20,
        _ => 8,
    }
}

/// Deterministic sample community for the estimated tier; audience sizes
/// scale with catalogue popularity.
fn synthesized_representatives(dest: &Destination) -> Vec<RepresentativeCreator> {
    let scale = 0.5 + dest.popularity;
    [
        (format!("{} Creators Collective", dest.name), 25_000u64),
        (format!("Discover {}", dest.name), 12_000),
        (format!("{} Daily", dest.name), 8_000),
    ]
    .into_iter()
    .map(|(name, base)| RepresentativeCreator {
        name,
        audience: (base as f32 * scale) as u64,
    })
    .collect()
}
