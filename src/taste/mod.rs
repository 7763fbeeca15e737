// src/taste/mod.rs
//! Taste-vector pipeline: keyword taxonomy, per-field signal extraction and
//! ordered accumulation into a seven-dimension preference vector.

pub mod builder;
pub mod signals;
pub mod taxonomy;
pub mod vector;

use serde::{Deserialize, Serialize};

pub use builder::{derive_taste, CONFIDENCE_MAX, CONFIDENCE_MIN};
pub use vector::{Dimension, TasteVector};

/// A derived taste vector plus the input-richness confidence that came with
/// it. Confidence drives provenance labeling on the degraded path, nothing
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TasteProfile {
    #[serde(flatten)]
    pub vector: TasteVector,
    pub confidence: f32,
}

impl TasteProfile {
    /// Neutral profile used by the static last-resort path.
    pub fn neutral() -> Self {
        Self {
            vector: TasteVector::base(),
            confidence: CONFIDENCE_MIN,
        }
    }
}
