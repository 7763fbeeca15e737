// src/scoring/mod.rs
//! Destination scoring: five weighted factors, a post-sum theme bonus and a
//! stable descending ranking. Pure and synchronous; anything network-derived
//! (taste-graph affinity) arrives as an optional input.

pub mod weights;

use serde::Serialize;

use crate::catalog::Destination;
use crate::currency::{self, CostTier};
use crate::taste::taxonomy::Taxonomy;
use crate::taste::vector::{Dimension, TasteVector};
use crate::taste::TasteProfile;

pub use weights::{FactorWeights, WEIGHTS};

/// Bonus added after the weighted sum when creator themes line up with a
/// destination tag.
pub const THEME_BONUS: f32 = 0.05;

const BUSINESS_CATEGORY: &str = "business";
const FOOD_CATEGORY: &str = "food";
const BUSINESS_TAG: &str = "business-hub";
const FOOD_TAG: &str = "food-capital";

/// User constraints the scorer honors beyond the taste vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorePrefs {
    /// Daily spend in USD, already converted by the currency service.
    pub daily_budget_usd: Option<f32>,
}

/// Weighted per-factor contributions. Fields hold the contribution after the
/// weight is applied, so they sum (plus `theme_bonus`) to the pre-clamp total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    pub taste_affinity: f32,
    pub community_engagement: f32,
    pub brand_fit: f32,
    pub budget_alignment: f32,
    pub collaboration_potential: f32,
    pub theme_bonus: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    /// Final score in [0, 1].
    pub total: f32,
    pub breakdown: FactorBreakdown,
}

impl CompositeScore {
    /// UI-facing 0–100 integer.
    pub fn match_score(&self) -> u8 {
        (self.total * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Score one candidate against the taste vector with the catalogue popularity
/// standing in for community engagement.
pub fn score_destination(
    profile: &TasteProfile,
    themes: &[String],
    candidate: &Destination,
    prefs: &ScorePrefs,
) -> CompositeScore {
    score_with_affinity(profile, themes, candidate, prefs, None)
}

/// Same as [`score_destination`] but with an externally supplied community
/// affinity (the taste-graph tier feeds `query.affinity` through here).
pub fn score_with_affinity(
    profile: &TasteProfile,
    themes: &[String],
    candidate: &Destination,
    prefs: &ScorePrefs,
    affinity: Option<f32>,
) -> CompositeScore {
    let vector = &profile.vector;
    let attrs = &candidate.attributes;

    let taste = taste_affinity(vector, candidate);
    let community = clamp01(affinity.unwrap_or(candidate.popularity));
    let brand = 0.6 * attrs.luxury + 0.4 * attrs.urban;
    let budget = budget_alignment(vector, candidate, prefs);
    let collab = 0.6 * attrs.urban + 0.4 * attrs.culture;

    let breakdown = FactorBreakdown {
        taste_affinity: WEIGHTS.taste_affinity * taste,
        community_engagement: WEIGHTS.community_engagement * community,
        brand_fit: WEIGHTS.brand_fit * brand,
        budget_alignment: WEIGHTS.budget_alignment * budget,
        collaboration_potential: WEIGHTS.collaboration_potential * collab,
        theme_bonus: theme_bonus(themes, candidate),
    };

    let total = clamp01(
        breakdown.taste_affinity
            + breakdown.community_engagement
            + breakdown.brand_fit
            + breakdown.budget_alignment
            + breakdown.collaboration_potential
            + breakdown.theme_bonus,
    );

    CompositeScore { total, breakdown }
}

/// Mean of per-dimension products. High only when the creator cares about
/// what the destination actually offers.
fn taste_affinity(vector: &TasteVector, candidate: &Destination) -> f32 {
    let sum: f32 = Dimension::ALL
        .iter()
        .map(|d| vector.get(*d) * candidate.attributes.get(*d))
        .sum();
    sum / Dimension::ALL.len() as f32
}

/// Budget alignment prefers explicit user constraints over the derived
/// budget dimension.
fn budget_alignment(vector: &TasteVector, candidate: &Destination, prefs: &ScorePrefs) -> f32 {
    let friendliness = candidate.attributes.budget;
    match prefs.daily_budget_usd {
        Some(daily) => match currency::cost_tier(daily) {
            CostTier::Budget => friendliness,
            CostTier::Premium => 1.0 - friendliness,
            CostTier::Mid => 1.0 - 2.0 * (friendliness - 0.5).abs(),
        },
        None => {
            if vector.budget >= 0.5 {
                friendliness
            } else {
                1.0 - friendliness
            }
        }
    }
}

fn theme_bonus(themes: &[String], candidate: &Destination) -> f32 {
    let taxonomy = Taxonomy::global();
    let theme_hits_category = |cat: &str| {
        themes
            .iter()
            .any(|t| taxonomy.matching_categories(t).iter().any(|c| c.id == cat))
    };

    let mut bonus = 0.0;
    if candidate.has_tag(BUSINESS_TAG) && theme_hits_category(BUSINESS_CATEGORY) {
        bonus += THEME_BONUS;
    }
    if candidate.has_tag(FOOD_TAG) && theme_hits_category(FOOD_CATEGORY) {
        bonus += THEME_BONUS;
    }
    bonus
}

/// Rank all candidates, highest first. `sort_by` is stable, so equal totals
/// keep catalogue declaration order.
pub fn rank<'a>(
    profile: &TasteProfile,
    themes: &[String],
    candidates: impl IntoIterator<Item = &'a Destination>,
    prefs: &ScorePrefs,
    affinity_for: impl Fn(&Destination) -> Option<f32>,
) -> Vec<(&'a Destination, CompositeScore)> {
    let mut scored: Vec<(&Destination, CompositeScore)> = candidates
        .into_iter()
        .map(|c| {
            let score = score_with_affinity(profile, themes, c, prefs, affinity_for(c));
            (c, score)
        })
        .collect();
    scored.sort_by(|a, b| b.1.total.total_cmp(&a.1.total));
    scored
}
