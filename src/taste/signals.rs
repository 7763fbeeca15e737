// src/taste/signals.rs
//! Per-field signal extraction.
//!
//! Each profile field yields zero or more [`Signal`]s: the field category, the
//! token that triggered it, and raw (dimension, delta) contributions from the
//! taxonomy. The builder multiplies deltas by the category weight and applies
//! them in a fixed field order, so extraction itself stays order-free.

use crate::currency::{self, SpendingTier};
use crate::profile::WebsiteProfile;
use crate::taste::taxonomy::Taxonomy;
use crate::taste::vector::Dimension;

/// Which profile field a signal came from. The weight scales every delta the
/// signal carries; hints are self-reported and count less, metadata text is
/// noisy and counts least.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalCategory {
    Theme,
    ContentType,
    Hint,
    SocialPlatform,
    MetadataText,
    AudienceLocation,
}

impl SignalCategory {
    pub fn weight(self) -> f32 {
        match self {
            SignalCategory::Theme => 1.0,
            SignalCategory::ContentType => 1.0,
            SignalCategory::Hint => 0.6,
            SignalCategory::SocialPlatform => 1.0,
            SignalCategory::MetadataText => 0.5,
            SignalCategory::AudienceLocation => 1.0,
        }
    }
}

/// One extracted signal. `origin` names the matched token (theme text,
/// platform name, taxonomy category id) for tracing.
#[derive(Debug, Clone)]
pub struct Signal {
    pub category: SignalCategory,
    pub origin: String,
    pub contributions: Vec<(Dimension, f32)>,
}

impl Signal {
    fn new(category: SignalCategory, origin: impl Into<String>) -> Self {
        Self {
            category,
            origin: origin.into(),
            contributions: Vec::new(),
        }
    }
}

/// Match each theme against the keyword taxonomy. A theme that lands in two
/// categories produces two signals.
pub fn from_themes(taxonomy: &Taxonomy, themes: &[String]) -> Vec<Signal> {
    let mut out = Vec::new();
    for theme in themes {
        for cat in taxonomy.matching_categories(theme) {
            let mut sig = Signal::new(SignalCategory::Theme, cat.id.as_str());
            sig.contributions = cat.deltas.clone();
            out.push(sig);
        }
    }
    out
}

/// The declared content type maps through the taxonomy's content-type table.
pub fn from_content_type(taxonomy: &Taxonomy, content_type: &str) -> Option<Signal> {
    let mapping = taxonomy.content_type(content_type)?;
    let mut sig = Signal::new(SignalCategory::ContentType, mapping.name.as_str());
    sig.contributions = mapping.deltas.clone();
    Some(sig)
}

/// User-supplied hints run through the same taxonomy as themes but at the
/// reduced hint weight.
pub fn from_hints(taxonomy: &Taxonomy, hints: &[String]) -> Vec<Signal> {
    let mut out = Vec::new();
    for hint in hints {
        for cat in taxonomy.matching_categories(hint) {
            let mut sig = Signal::new(SignalCategory::Hint, cat.id.as_str());
            sig.contributions = cat.deltas.clone();
            out.push(sig);
        }
    }
    out
}

/// Platform-presence deltas. The platform mix says something about format and
/// audience: short-video platforms skew urban, LinkedIn skews business travel.
fn platform_deltas(platform: &str) -> Option<&'static [(Dimension, f32)]> {
    let p = platform.trim().to_lowercase();
    let deltas: &'static [(Dimension, f32)] = match p.as_str() {
        "youtube" => &[(Dimension::Adventure, 0.05), (Dimension::Nature, 0.05)],
        "instagram" => &[(Dimension::Luxury, 0.06), (Dimension::Urban, 0.05)],
        "tiktok" => &[(Dimension::Urban, 0.08)],
        "linkedin" => &[(Dimension::Urban, 0.08), (Dimension::Luxury, 0.04)],
        "pinterest" => &[(Dimension::Food, 0.05), (Dimension::Culture, 0.04)],
        "twitch" => &[(Dimension::Urban, 0.05)],
        "twitter" | "x" => &[(Dimension::Urban, 0.04)],
        _ => return None,
    };
    Some(deltas)
}

/// Platforms crawlers can size an audience on; used by confidence scoring.
pub fn is_major_platform(platform: &str) -> bool {
    matches!(
        platform.trim().to_lowercase().as_str(),
        "youtube" | "instagram" | "tiktok"
    )
}

pub fn from_social(profile: &WebsiteProfile) -> Vec<Signal> {
    profile
        .social_links
        .iter()
        .filter_map(|link| {
            platform_deltas(&link.platform).map(|deltas| {
                let mut sig =
                    Signal::new(SignalCategory::SocialPlatform, link.platform.to_lowercase());
                sig.contributions = deltas.to_vec();
                sig
            })
        })
        .collect()
}

/// Title, description and keywords concatenate into one text blob and run
/// through the taxonomy once at the metadata weight.
pub fn from_metadata(taxonomy: &Taxonomy, profile: &WebsiteProfile) -> Vec<Signal> {
    let text = profile.metadata_text();
    if text.is_empty() {
        return Vec::new();
    }
    taxonomy
        .matching_categories(&text)
        .into_iter()
        .map(|cat| {
            let mut sig = Signal::new(SignalCategory::MetadataText, cat.id.as_str());
            sig.contributions = cat.deltas.clone();
            sig
        })
        .collect()
}

/// Audience spending power nudges the luxury/budget axis. The locale table in
/// [`crate::currency`] owns the region classification.
pub fn from_audience(profile: &WebsiteProfile) -> Option<Signal> {
    let location = profile.audience_location.as_deref()?;
    let locale = currency::detect_locale(Some(location));
    let tier = locale.tier?;
    let mut sig = Signal::new(SignalCategory::AudienceLocation, location.to_lowercase());
    sig.contributions = match tier {
        SpendingTier::High => vec![(Dimension::Luxury, 0.05), (Dimension::Budget, -0.05)],
        SpendingTier::Emerging => vec![(Dimension::Budget, 0.08)],
    };
    Some(sig)
}
