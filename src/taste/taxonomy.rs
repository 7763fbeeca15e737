// src/taste/taxonomy.rs
//! Fixed keyword taxonomy: category substrings → per-dimension deltas, plus
//! the content-type mapping table. Embedded at build time and compiled once;
//! this is read-only reference data, never mutated at request time.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::taste::vector::Dimension;

static TAXONOMY: Lazy<Taxonomy> = Lazy::new(|| {
    let raw = include_str!("../../config/taxonomy.toml");
    Taxonomy::from_toml_str(raw).expect("valid embedded taxonomy")
});

/* ----------------------------
TOML schema
---------------------------- */

#[derive(Debug, Deserialize)]
struct TaxonomyRoot {
    categories: Vec<CategoryCfg>,
    #[serde(default)]
    content_types: Vec<ContentTypeCfg>,
}

#[derive(Debug, Deserialize)]
struct CategoryCfg {
    id: String,
    keywords: Vec<String>,
    deltas: HashMap<String, f32>,
}

#[derive(Debug, Deserialize)]
struct ContentTypeCfg {
    name: String,
    deltas: HashMap<String, f32>,
}

/* ----------------------------
Compiled structures
---------------------------- */

/// One keyword category with its dimension deltas.
#[derive(Debug, Clone)]
pub struct TaxonomyCategory {
    pub id: String,
    keywords: Vec<String>,
    pub deltas: Vec<(Dimension, f32)>,
}

impl TaxonomyCategory {
    /// Substring match against already-normalized, lowercased text.
    pub fn matches(&self, lower_text: &str) -> bool {
        self.keywords.iter().any(|k| lower_text.contains(k.as_str()))
    }
}

/// A known content type and its deltas. Matched by exact name,
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct ContentTypeMapping {
    pub name: String,
    pub deltas: Vec<(Dimension, f32)>,
}

#[derive(Debug)]
pub struct Taxonomy {
    categories: Vec<TaxonomyCategory>,
    content_types: Vec<ContentTypeMapping>,
}

impl Taxonomy {
    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        let root: TaxonomyRoot = toml::from_str(raw)?;

        let categories = root
            .categories
            .into_iter()
            .map(|c| {
                let deltas = parse_deltas(&c.id, &c.deltas)?;
                Ok(TaxonomyCategory {
                    id: c.id,
                    keywords: c.keywords.iter().map(|k| k.to_lowercase()).collect(),
                    deltas,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let content_types = root
            .content_types
            .into_iter()
            .map(|c| {
                let deltas = parse_deltas(&c.name, &c.deltas)?;
                Ok(ContentTypeMapping {
                    name: c.name,
                    deltas,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self {
            categories,
            content_types,
        })
    }

    /// The embedded, process-wide taxonomy.
    pub fn global() -> &'static Taxonomy {
        &TAXONOMY
    }

    /// All categories whose keywords appear in `text` (caller lowercases).
    pub fn matching_categories(&self, lower_text: &str) -> Vec<&TaxonomyCategory> {
        self.categories
            .iter()
            .filter(|c| c.matches(lower_text))
            .collect()
    }

    pub fn category(&self, id: &str) -> Option<&TaxonomyCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Exact (case-insensitive) content-type lookup. Unknown types yield
    /// `None`: no contribution, no error.
    pub fn content_type(&self, name: &str) -> Option<&ContentTypeMapping> {
        let wanted = name.trim();
        if wanted.is_empty() {
            return None;
        }
        self.content_types
            .iter()
            .find(|ct| ct.name.eq_ignore_ascii_case(wanted))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

fn parse_deltas(owner: &str, raw: &HashMap<String, f32>) -> anyhow::Result<Vec<(Dimension, f32)>> {
    let mut out = Vec::with_capacity(raw.len());
    for (key, delta) in raw {
        let dim = Dimension::from_key(key)
            .ok_or_else(|| anyhow::anyhow!("taxonomy `{owner}`: unknown dimension `{key}`"))?;
        out.push((dim, *delta));
    }
    // HashMap iteration order is unstable; fix on canonical dimension order so
    // accumulation stays deterministic run to run.
    out.sort_by_key(|(d, _)| Dimension::ALL.iter().position(|x| x == d));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_taxonomy_loads() {
        let t = Taxonomy::global();
        assert!(t.category_count() >= 8);
        assert!(t.category("adventure").is_some());
        assert!(t.content_type("Travel & Adventure").is_some());
    }

    #[test]
    fn matching_is_substring_on_lowercased_text() {
        let t = Taxonomy::global();
        let hits = t.matching_categories("weekend hiking and street food tours");
        let ids: Vec<&str> = hits.iter().map(|c| c.id.as_str()).collect();
        assert!(ids.contains(&"adventure"));
        assert!(ids.contains(&"food"));
        assert!(!ids.contains(&"luxury"));
    }

    #[test]
    fn content_type_lookup_is_case_insensitive_and_exact() {
        let t = Taxonomy::global();
        assert!(t.content_type("luxury lifestyle").is_some());
        assert!(t.content_type("Luxury").is_none());
        assert!(t.content_type("").is_none());
        assert!(t.content_type("Gaming & Esports").is_none());
    }

    #[test]
    fn unknown_dimension_key_is_rejected() {
        let bad = r#"
[[categories]]
id = "broken"
keywords = ["x"]
deltas = { vibes = 0.2 }
"#;
        assert!(Taxonomy::from_toml_str(bad).is_err());
    }

    #[test]
    fn deltas_are_ordered_canonically() {
        let t = Taxonomy::global();
        let lux = t.category("luxury").unwrap();
        // luxury before budget in Dimension::ALL order
        let pos_l = lux.deltas.iter().position(|(d, _)| *d == Dimension::Luxury);
        let pos_b = lux.deltas.iter().position(|(d, _)| *d == Dimension::Budget);
        assert!(pos_l < pos_b);
    }
}
