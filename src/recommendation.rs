//! Response shapes for the recommendation surface.
//!
//! Everything here is plain data: the pipeline decides, these types carry.
//! Field names are locked to the UI contract, so serde renames live here and
//! nowhere else.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Destination;
use crate::currency::{self, Currency};
use crate::scoring::FactorBreakdown;
use crate::viability::{
    CreatorCommunityRecord, DataSource, RepresentativeCreator, MINIMUM_THRESHOLD,
};

/// Provenance label surfaced to clients in the metadata envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceTag {
    QlooApi,
    Real,
    EnhancedMock,
    StaticFallback,
}

/// Locally scored results at or above this confidence are labelled `real`;
/// below it the profile was too thin and the label says so.
pub const REAL_CONFIDENCE_FLOOR: f32 = 0.6;

impl SourceTag {
    /// Label for the locally scored tier, split on derivation confidence.
    pub fn for_local(confidence: f32) -> Self {
        if confidence >= REAL_CONFIDENCE_FLOOR {
            SourceTag::Real
        } else {
            SourceTag::EnhancedMock
        }
    }
}

/// Trip cost estimate in the traveller's display currency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEstimate {
    /// e.g. `"$530 – $830 for 7 days"`.
    pub range: String,
    pub breakdown: BudgetBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    pub accommodation: String,
    pub food: String,
    pub activities: String,
    pub local_transport: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub destination: String,
    pub country: String,
    /// 0–100 integer for the UI.
    pub match_score: u8,
    pub budget: BudgetEstimate,
    pub creator_details: CreatorCommunityRecord,
    pub tags: Vec<String>,
    pub best_months: Vec<String>,
    /// Absent on the static tier, which has no score to explain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<FactorBreakdown>,
}

/// Envelope attached to every response, degraded or not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub fallback: bool,
    pub source: SourceTag,
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl Metadata {
    pub fn new(source: SourceTag, fallback: bool, elapsed: Duration) -> Self {
        Self {
            fallback,
            source,
            generated_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub recommendations: Vec<Recommendation>,
    pub metadata: Metadata,
}

const RANGE_LOW: f32 = 0.80;
const RANGE_HIGH: f32 = 1.25;
const ACCOMMODATION_SHARE: f32 = 0.40;
const FOOD_SHARE: f32 = 0.25;
const ACTIVITIES_SHARE: f32 = 0.20;
const TRANSPORT_SHARE: f32 = 0.15;

/// Cost band for a trip, from the catalogue daily USD cost converted into the
/// display currency.
pub fn budget_estimate(
    dest: &Destination,
    duration_days: u32,
    display: &'static Currency,
) -> BudgetEstimate {
    let days = duration_days.max(1);
    let total = currency::from_usd(dest.daily_cost_usd, display) * days as f32;

    let range = format!(
        "{} – {} for {} {}",
        currency::format_face(total * RANGE_LOW, display),
        currency::format_face(total * RANGE_HIGH, display),
        days,
        if days == 1 { "day" } else { "days" },
    );

    let part = |share: f32| currency::format_face(total * share, display);
    BudgetEstimate {
        range,
        breakdown: BudgetBreakdown {
            accommodation: part(ACCOMMODATION_SHARE),
            food: part(FOOD_SHARE),
            activities: part(ACTIVITIES_SHARE),
            local_transport: part(TRANSPORT_SHARE),
        },
    }
}

/// The answer of last resort. Every tier above it failed, so this is fully
/// hand-authored: no catalogue lookup, no conversion, nothing that can fail.
pub fn static_fallback() -> Vec<Recommendation> {
    vec![Recommendation {
        destination: "Lisbon".to_string(),
        country: "Portugal".to_string(),
        match_score: 74,
        budget: BudgetEstimate {
            range: "$530 – $830 for 7 days".to_string(),
            breakdown: BudgetBreakdown {
                accommodation: "$270".to_string(),
                food: "$165".to_string(),
                activities: "$135".to_string(),
                local_transport: "$100".to_string(),
            },
        },
        creator_details: CreatorCommunityRecord {
            total_active_creators: 38,
            representative_creators: vec![
                RepresentativeCreator {
                    name: "Lisbon Creators Collective".to_string(),
                    audience: 31_000,
                },
                RepresentativeCreator {
                    name: "Discover Lisbon".to_string(),
                    audience: 15_000,
                },
                RepresentativeCreator {
                    name: "Lisbon Daily".to_string(),
                    audience: 9_800,
                },
            ],
            data_source: DataSource::Estimated,
            minimum_threshold: MINIMUM_THRESHOLD,
        },
        tags: vec![
            "food-capital".to_string(),
            "coastal".to_string(),
            "digital-nomad".to_string(),
        ],
        best_months: vec![
            "April".to_string(),
            "May".to_string(),
            "June".to_string(),
            "September".to_string(),
            "October".to_string(),
        ],
        score_breakdown: None,
    }]
}
