// src/taste/builder.rs
//! Taste-vector derivation.
//!
//! Signals apply in a fixed field order (themes, content type, hints, social,
//! metadata, audience) with per-step saturation, so the result is reproducible
//! for a given profile even though accumulation is order-dependent. Confidence
//! reflects input richness only, never scoring quality.

use tracing::debug;

use crate::profile::{anon_hash, WebsiteProfile};
use crate::taste::signals::{self, Signal, SignalCategory};
use crate::taste::taxonomy::Taxonomy;
use crate::taste::vector::TasteVector;
use crate::taste::TasteProfile;

pub const CONFIDENCE_MIN: f32 = 0.30;
pub const CONFIDENCE_MAX: f32 = 0.92;

const THEME_BONUS: f32 = 0.05;
const THEME_BONUS_CAP: f32 = 0.15;
const CONTENT_TYPE_BONUS: f32 = 0.08;
const HINT_BONUS: f32 = 0.04;
const HINT_BONUS_CAP: f32 = 0.12;
const SOCIAL_BONUS: f32 = 0.03;
const SOCIAL_BONUS_CAP: f32 = 0.09;
const MAJOR_PLATFORM_BONUS: f32 = 0.05;
const METADATA_SHORT_BONUS: f32 = 0.04;
const METADATA_LONG_BONUS: f32 = 0.08;
const METADATA_SHORT_LEN: usize = 40;
const METADATA_LONG_LEN: usize = 160;
const CONSISTENCY_BONUS_ONE: f32 = 0.05;
const CONSISTENCY_BONUS_MANY: f32 = 0.10;

/// Derive a taste profile from a website profile. Pure and synchronous;
/// callers on the fallback path pick provenance from the confidence score.
pub fn derive_taste(profile: &WebsiteProfile) -> TasteProfile {
    let taxonomy = Taxonomy::global();

    let theme_sigs = signals::from_themes(taxonomy, &profile.themes);
    let content_sig = profile
        .content_type
        .as_deref()
        .and_then(|ct| signals::from_content_type(taxonomy, ct));
    let hint_sigs = signals::from_hints(taxonomy, &profile.hints);
    let social_sigs = signals::from_social(profile);
    let metadata_sigs = signals::from_metadata(taxonomy, profile);
    let audience_sig = signals::from_audience(profile);

    let mut vector = TasteVector::base();
    apply_all(&mut vector, &theme_sigs);
    if let Some(sig) = &content_sig {
        apply_all(&mut vector, std::slice::from_ref(sig));
    }
    apply_all(&mut vector, &hint_sigs);
    apply_all(&mut vector, &social_sigs);
    apply_all(&mut vector, &metadata_sigs);
    if let Some(sig) = &audience_sig {
        apply_all(&mut vector, std::slice::from_ref(sig));
    }
    let vector = vector.clamp_final();

    let confidence = confidence_score(
        profile,
        taxonomy,
        &theme_sigs,
        content_sig.is_some(),
        &metadata_sigs,
    );

    debug!(
        url = %anon_hash(&profile.url),
        themes = profile.themes.len(),
        signals = theme_sigs.len()
            + content_sig.iter().len()
            + hint_sigs.len()
            + social_sigs.len()
            + metadata_sigs.len()
            + audience_sig.iter().len(),
        confidence = format!("{confidence:.2}"),
        "taste vector derived"
    );

    TasteProfile { vector, confidence }
}

fn apply_all(vector: &mut TasteVector, sigs: &[Signal]) {
    for sig in sigs {
        let w = sig.category.weight();
        for (dim, delta) in &sig.contributions {
            vector.bump(*dim, delta * w);
        }
    }
}

/// Input-richness confidence in `[0.30, 0.92]`. Each field contributes a
/// capped bonus; agreement between themes and metadata adds a consistency
/// bonus on top.
fn confidence_score(
    profile: &WebsiteProfile,
    taxonomy: &Taxonomy,
    theme_sigs: &[Signal],
    content_type_known: bool,
    metadata_sigs: &[Signal],
) -> f32 {
    let mut score = CONFIDENCE_MIN;

    score += (profile.themes.len() as f32 * THEME_BONUS).min(THEME_BONUS_CAP);
    if content_type_known {
        score += CONTENT_TYPE_BONUS;
    }

    let matched_hints = profile
        .hints
        .iter()
        .filter(|h| !taxonomy.matching_categories(h).is_empty())
        .count();
    score += (matched_hints as f32 * HINT_BONUS).min(HINT_BONUS_CAP);

    let recognized_socials = signals::from_social(profile).len();
    score += (recognized_socials as f32 * SOCIAL_BONUS).min(SOCIAL_BONUS_CAP);
    if profile
        .social_links
        .iter()
        .any(|l| signals::is_major_platform(&l.platform))
    {
        score += MAJOR_PLATFORM_BONUS;
    }

    let meta_len = profile.metadata_text().len();
    if meta_len >= METADATA_LONG_LEN {
        score += METADATA_LONG_BONUS;
    } else if meta_len >= METADATA_SHORT_LEN {
        score += METADATA_SHORT_BONUS;
    }

    score += consistency_bonus(theme_sigs, metadata_sigs);

    score.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX)
}

/// Themes and metadata landing in the same taxonomy categories corroborate
/// each other.
fn consistency_bonus(theme_sigs: &[Signal], metadata_sigs: &[Signal]) -> f32 {
    let shared = metadata_sigs
        .iter()
        .filter(|m| m.category == SignalCategory::MetadataText)
        .filter(|m| theme_sigs.iter().any(|t| t.origin == m.origin))
        .count();
    match shared {
        0 => 0.0,
        1 => CONSISTENCY_BONUS_ONE,
        _ => CONSISTENCY_BONUS_MANY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SocialLink;
    use crate::taste::vector::Dimension;

    fn adventure_profile() -> WebsiteProfile {
        WebsiteProfile {
            url: "https://trailblazers.example".into(),
            themes: vec![
                "hiking".into(),
                "wildlife photography".into(),
                "camping".into(),
            ],
            content_type: Some("Travel & Adventure".into()),
            description: Some("Backpacking routes, national parks and outdoor gear tests".into()),
            ..Default::default()
        }
    }

    fn luxury_profile() -> WebsiteProfile {
        WebsiteProfile {
            url: "https://gilded.example".into(),
            themes: vec!["five-star resorts".into(), "fine dining".into()],
            content_type: Some("Luxury Lifestyle".into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_profile_returns_base_vector_at_floor_confidence() {
        let tp = derive_taste(&WebsiteProfile::default());
        assert_eq!(tp.vector, TasteVector::base());
        assert_eq!(tp.confidence, CONFIDENCE_MIN);
    }

    #[test]
    fn adventure_inputs_outrank_luxury_inputs_on_outdoor_dimensions() {
        let adv = derive_taste(&adventure_profile());
        let lux = derive_taste(&luxury_profile());
        assert!(adv.vector.get(Dimension::Adventure) > lux.vector.get(Dimension::Adventure));
        assert!(adv.vector.get(Dimension::Nature) > lux.vector.get(Dimension::Nature));
        assert!(lux.vector.get(Dimension::Luxury) > adv.vector.get(Dimension::Luxury));
    }

    #[test]
    fn derived_vector_stays_in_range() {
        // Pile on enough signals to saturate several dimensions.
        let mut p = adventure_profile();
        p.hints = vec!["hiking".into(), "trekking".into(), "safari".into()];
        p.keywords = vec!["mountains".into(), "kayaking".into(), "climbing".into()];
        let tp = derive_taste(&p);
        assert!(tp.vector.in_range());
        assert!(tp.vector.get(Dimension::Adventure) <= 0.95);
    }

    #[test]
    fn confidence_grows_with_richness() {
        let sparse = derive_taste(&WebsiteProfile {
            url: "https://a.example".into(),
            themes: vec!["food".into()],
            ..Default::default()
        });
        let mut rich_profile = adventure_profile();
        rich_profile.social_links = vec![SocialLink {
            platform: "YouTube".into(),
            url: "https://youtube.com/@trail".into(),
        }];
        let rich = derive_taste(&rich_profile);
        assert!(rich.confidence > sparse.confidence);
        assert!(rich.confidence <= CONFIDENCE_MAX);
    }

    #[test]
    fn hints_move_the_vector_less_than_themes() {
        let themed = derive_taste(&WebsiteProfile {
            url: "https://t.example".into(),
            themes: vec!["hiking".into()],
            ..Default::default()
        });
        let hinted = derive_taste(&WebsiteProfile {
            url: "https://h.example".into(),
            hints: vec!["hiking".into()],
            ..Default::default()
        });
        let base = TasteVector::base().get(Dimension::Adventure);
        let themed_gain = themed.vector.get(Dimension::Adventure) - base;
        let hinted_gain = hinted.vector.get(Dimension::Adventure) - base;
        assert!(themed_gain > hinted_gain);
        assert!(hinted_gain > 0.0);
    }

    #[test]
    fn metadata_agreement_raises_confidence() {
        let matching = derive_taste(&WebsiteProfile {
            url: "https://m.example".into(),
            themes: vec!["hiking".into()],
            description: Some(
                "Long-form hiking guides with trail maps, gear lists and camping advice for remote backpacking trips"
                    .into(),
            ),
            ..Default::default()
        });
        let disjoint = derive_taste(&WebsiteProfile {
            url: "https://d.example".into(),
            themes: vec!["hiking".into()],
            description: Some(
                "Quarterly shareholder reports, product announcements and corporate press releases for investors"
                    .into(),
            ),
            ..Default::default()
        });
        assert!(matching.confidence > disjoint.confidence);
    }
}
