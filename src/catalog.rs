// src/catalog.rs
//! Embedded destination catalogue.
//!
//! Parsed once from `config/destinations.toml` and shared read-only for the
//! process lifetime. Catalogue order is the declaration order in the TOML
//! file and doubles as the tie-break order when scores are equal.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

use crate::taste::vector::Dimension;

/// Similarity bar for matching external entity names onto catalogue entries.
const NAME_MATCH_SIMILARITY: f64 = 0.8;

/// Destination attribute axes. Same seven axes as the taste vector but these
/// describe the place, not the creator; `budget` reads as budget-friendliness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    pub adventure: f32,
    pub culture: f32,
    pub luxury: f32,
    pub food: f32,
    pub nature: f32,
    pub urban: f32,
    pub budget: f32,
}

impl Attributes {
    pub fn get(&self, dim: Dimension) -> f32 {
        match dim {
            Dimension::Adventure => self.adventure,
            Dimension::Culture => self.culture,
            Dimension::Luxury => self.luxury,
            Dimension::Food => self.food,
            Dimension::Nature => self.nature,
            Dimension::Urban => self.urban,
            Dimension::Budget => self.budget,
        }
    }

    fn in_range(&self) -> bool {
        Dimension::ALL
            .iter()
            .all(|d| (0.0..=1.0).contains(&self.get(*d)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub country: String,
    pub region: String,
    pub popularity: f32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub best_months: Vec<String>,
    pub base_creators: u32,
    pub daily_cost_usd: f32,
    pub attributes: Attributes,
}

impl Destination {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRoot {
    #[serde(default)]
    destinations: Vec<Destination>,
}

#[derive(Debug)]
pub struct Catalog {
    destinations: Vec<Destination>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::from_toml_str(include_str!("../config/destinations.toml"))
        .expect("valid embedded destination catalogue")
});

impl Catalog {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let root: CatalogRoot =
            toml::from_str(raw).context("parsing destination catalogue TOML")?;
        if root.destinations.is_empty() {
            bail!("destination catalogue is empty");
        }
        for d in &root.destinations {
            if d.name.trim().is_empty() {
                bail!("destination {:?} has an empty name", d.id);
            }
            if !d.attributes.in_range() {
                bail!("destination {:?} has attributes outside [0, 1]", d.id);
            }
            if !(0.0..=1.0).contains(&d.popularity) {
                bail!("destination {:?} has popularity outside [0, 1]", d.id);
            }
            if d.daily_cost_usd <= 0.0 {
                bail!("destination {:?} has a non-positive daily cost", d.id);
            }
        }
        Ok(Self {
            destinations: root.destinations,
        })
    }

    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    /// Exact case-insensitive name lookup.
    pub fn by_name(&self, name: &str) -> Option<&Destination> {
        let needle = name.trim();
        self.destinations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(needle))
    }

    /// Map an external entity name onto a catalogue entry: exact match first,
    /// then best Levenshtein similarity above the bar. External services spell
    /// names their own way ("Lisboa", "Reikjavik") and must not miss on trivia.
    pub fn resolve_name(&self, name: &str) -> Option<&Destination> {
        if let Some(d) = self.by_name(name) {
            return Some(d);
        }
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.destinations
            .iter()
            .map(|d| {
                let sim = normalized_levenshtein(&needle, &d.name.to_lowercase());
                (d, sim)
            })
            .filter(|(_, sim)| *sim >= NAME_MATCH_SIMILARITY)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(d, _)| d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogue_parses() {
        let cat = Catalog::global();
        assert!(cat.len() >= 18, "expected a full catalogue, got {}", cat.len());
    }

    #[test]
    fn all_attributes_and_popularity_in_range() {
        for d in Catalog::global().iter() {
            assert!(d.attributes.in_range(), "{} out of range", d.id);
            assert!((0.0..=1.0).contains(&d.popularity), "{} popularity", d.id);
            assert!(d.daily_cost_usd > 0.0, "{} daily cost", d.id);
        }
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let cat = Catalog::global();
        assert_eq!(cat.by_name("tokyo").unwrap().id, "tokyo");
        assert_eq!(cat.by_name("  TOKYO ").unwrap().id, "tokyo");
        assert!(cat.by_name("Atlantis").is_none());
    }

    #[test]
    fn resolve_name_tolerates_near_spellings() {
        let cat = Catalog::global();
        assert_eq!(cat.resolve_name("Lisboa").unwrap().id, "lisbon");
        assert_eq!(cat.resolve_name("Bangkok").unwrap().id, "bangkok");
        assert!(cat.resolve_name("Gotham").is_none());
    }

    #[test]
    fn rejects_out_of_range_attributes() {
        let raw = r#"
            [[destinations]]
            id = "bad"
            name = "Bad"
            country = "Nowhere"
            region = "Nowhere"
            popularity = 0.5
            base_creators = 5
            daily_cost_usd = 50.0

            [destinations.attributes]
            adventure = 1.4
            culture = 0.5
            luxury = 0.5
            food = 0.5
            nature = 0.5
            urban = 0.5
            budget = 0.5
        "#;
        assert!(Catalog::from_toml_str(raw).is_err());
    }

    #[test]
    fn business_hub_tag_present_where_expected() {
        let cat = Catalog::global();
        assert!(cat.by_id("singapore").unwrap().has_tag("business-hub"));
        assert!(!cat.by_id("patagonia").unwrap().has_tag("business-hub"));
    }
}
