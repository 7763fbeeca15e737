//! Recommendation pipeline: derive the taste vector, rank the catalogue,
//! gate the shortlist for creator viability and answer through the fallback
//! cascade. The public entrypoint never fails; degraded tiers are reported
//! in the metadata envelope instead.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Result};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::catalog::{Catalog, Destination};
use crate::currency::USD;
use crate::fallback::{self, Tier};
use crate::interview::QuestionContext;
use crate::profile::{anon_hash, WebsiteProfile};
use crate::recommendation::{self, Metadata, Recommendation, RecommendationSet, SourceTag};
use crate::scoring::{self, CompositeScore, ScorePrefs};
use crate::sources::Collaborators;
use crate::taste::{derive_taste, TasteProfile};
use crate::viability::{self, CreatorCommunityRecord};

/// Wall-clock budget per cascade tier.
pub const TIER_DEADLINE: Duration = Duration::from_secs(12);

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 10;
/// Viability-gate this many ranked candidates per requested result slot.
const SHORTLIST_FACTOR: usize = 2;
const AFFINITY_TAKE: usize = 20;
const DEFAULT_TRIP_DAYS: u32 = 7;

/// Body of `POST /recommend`: the scraped profile plus optional interview
/// state and result cap.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub profile: WebsiteProfile,
    #[serde(default)]
    pub context: Option<QuestionContext>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "recommendation_requests_total",
            "Recommendation requests received."
        );
        describe_histogram!(
            "recommendation_duration_ms",
            "End-to-end recommendation latency in milliseconds."
        );
        describe_counter!(
            "fallback_primary_errors_total",
            "Primary tier failures absorbed by the cascade."
        );
        describe_counter!(
            "fallback_primary_timeouts_total",
            "Primary tier deadline hits."
        );
        describe_counter!(
            "fallback_last_resort_total",
            "Requests answered by the static last resort."
        );
        describe_counter!(
            "viability_qloo_total",
            "Viability records resolved by the taste graph."
        );
        describe_counter!(
            "viability_social_total",
            "Viability records resolved by channel search."
        );
        describe_counter!(
            "viability_estimated_total",
            "Viability records resolved by the local estimate."
        );
        describe_counter!(
            "viability_insufficient_total",
            "Destinations left below the creator threshold."
        );
        describe_counter!(
            "viability_tier_errors_total",
            "Collaborator failures absorbed by the viability gate."
        );
    });
}

/// Produce a recommendation set for one request. Infallible by contract:
/// the cascade bottoms out at a hand-authored static result, and the tier
/// that answered is reported in `metadata`.
pub async fn recommend(req: &RecommendRequest, clients: &Collaborators) -> RecommendationSet {
    ensure_metrics_described();
    counter!("recommendation_requests_total").increment(1);

    let taste = derive_taste(&req.profile);
    let prefs = ScorePrefs {
        daily_budget_usd: req.context.as_ref().and_then(|c| c.daily_budget_usd()),
    };
    let limit = req.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let guarded = fallback::with_fallback(
        "recommend",
        TIER_DEADLINE,
        || graph_scored(req, &taste, &prefs, limit, clients),
        || local_scored(req, &taste, &prefs, limit, clients),
        recommendation::static_fallback,
    )
    .await;

    let source = match guarded.tier {
        Tier::Primary => SourceTag::QlooApi,
        Tier::Fallback => SourceTag::for_local(taste.confidence),
        Tier::LastResort => SourceTag::StaticFallback,
    };
    let metadata = Metadata::new(source, guarded.degraded(), guarded.elapsed);

    histogram!("recommendation_duration_ms").record(metadata.elapsed_ms as f64);
    info!(
        site = %anon_hash(&req.profile.url),
        source = ?source,
        fallback = metadata.fallback,
        results = guarded.value.len(),
        elapsed_ms = metadata.elapsed_ms,
        "recommendation set generated"
    );

    RecommendationSet {
        recommendations: guarded.value,
        metadata,
    }
}

/// Primary tier: taste-graph affinities feed the community-engagement factor.
/// Errors surface so the orchestrator can degrade to local scoring.
async fn graph_scored(
    req: &RecommendRequest,
    taste: &TasteProfile,
    prefs: &ScorePrefs,
    limit: usize,
    clients: &Collaborators,
) -> Result<Vec<Recommendation>> {
    if !clients.taste_graph.configured() {
        bail!("taste graph not configured");
    }

    let interests = interest_terms(&req.profile);
    let entities = clients
        .taste_graph
        .destination_affinities(&interests, AFFINITY_TAKE)
        .await?;

    let catalog = Catalog::global();
    let mut affinities: HashMap<&str, f32> = HashMap::new();
    for entity in &entities {
        let Some(dest) = catalog.resolve_name(&entity.name) else {
            continue;
        };
        if let Some(aff) = entity.affinity_or_popularity() {
            affinities
                .entry(dest.id.as_str())
                .or_insert(aff.clamp(0.0, 1.0));
        }
    }
    if affinities.is_empty() {
        bail!("taste graph returned no catalogue-resolvable entities");
    }

    let ranked = scoring::rank(taste, &req.profile.themes, catalog.iter(), prefs, |d| {
        affinities.get(d.id.as_str()).copied()
    });
    gate_and_build(ranked, req, limit, clients).await
}

/// Fallback tier: purely local scoring over the full catalogue, popularity
/// standing in for graph affinity.
async fn local_scored(
    req: &RecommendRequest,
    taste: &TasteProfile,
    prefs: &ScorePrefs,
    limit: usize,
    clients: &Collaborators,
) -> Result<Vec<Recommendation>> {
    let ranked = scoring::rank(
        taste,
        &req.profile.themes,
        Catalog::global().iter(),
        prefs,
        |_| None,
    );
    gate_and_build(ranked, req, limit, clients).await
}

/// Gate the ranked shortlist for creator viability concurrently, drop
/// below-threshold destinations and assemble response rows in rank order.
async fn gate_and_build(
    ranked: Vec<(&Destination, CompositeScore)>,
    req: &RecommendRequest,
    limit: usize,
    clients: &Collaborators,
) -> Result<Vec<Recommendation>> {
    let shortlist: Vec<(&Destination, CompositeScore)> = ranked
        .into_iter()
        .take(limit * SHORTLIST_FACTOR)
        .collect();

    let mut set = JoinSet::new();
    for (idx, (dest, _)) in shortlist.iter().enumerate() {
        let dest = (*dest).clone();
        let themes = req.profile.themes.clone();
        let content_type = req.profile.content_type.clone();
        let clients = clients.clone();
        set.spawn(async move {
            let record =
                viability::creator_community(&dest, &themes, content_type.as_deref(), &clients)
                    .await;
            (idx, record)
        });
    }

    let mut records: Vec<Option<CreatorCommunityRecord>> = vec![None; shortlist.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((idx, record)) => records[idx] = Some(record),
            Err(e) => warn!(error = %e, "viability task aborted"),
        }
    }

    let mut rows = Vec::with_capacity(limit);
    for ((dest, score), record) in shortlist.into_iter().zip(records) {
        let Some(record) = record else { continue };
        if !viability::should_recommend(&record) {
            continue;
        }
        rows.push(build_row(dest, &score, record, req.context.as_ref()));
        if rows.len() == limit {
            break;
        }
    }

    if rows.is_empty() {
        bail!("no destination cleared the creator-viability gate");
    }
    Ok(rows)
}

fn build_row(
    dest: &Destination,
    score: &CompositeScore,
    record: CreatorCommunityRecord,
    context: Option<&QuestionContext>,
) -> Recommendation {
    let duration = context
        .and_then(|c| c.duration_days)
        .unwrap_or(DEFAULT_TRIP_DAYS);
    let display = context.map(|c| c.active_currency()).unwrap_or(&USD);
    Recommendation {
        destination: dest.name.clone(),
        country: dest.country.clone(),
        match_score: score.match_score(),
        budget: recommendation::budget_estimate(dest, duration, display),
        creator_details: record,
        tags: dest.tags.clone(),
        best_months: dest.best_months.clone(),
        score_breakdown: Some(score.breakdown),
    }
}

/// Interest tags for the taste graph: themes, the declared content type and a
/// few scraper hints, lowercased and deduplicated.
fn interest_terms(profile: &WebsiteProfile) -> Vec<String> {
    let mut terms: Vec<String> = profile
        .themes
        .iter()
        .map(|t| t.trim().to_lowercase())
        .collect();
    if let Some(ct) = profile.content_type.as_deref() {
        terms.push(ct.trim().to_lowercase());
    }
    for hint in profile.hints.iter().take(3) {
        terms.push(hint.trim().to_lowercase());
    }
    terms.retain(|t| !t.is_empty());
    terms.dedup();
    terms
}
