// src/taste/vector.rs
//! The 7-dimensional taste vector and its range contract.
//!
//! Every dimension ends up in `[DIM_MIN, DIM_MAX]`, never exactly 0 or 1,
//! so no downstream product term can collapse a composite score to a
//! degenerate value. The vector is built once per request and is immutable
//! outside this module tree.

use serde::{Deserialize, Serialize};

/// Lower bound for any dimension after the final clamp.
pub const DIM_MIN: f32 = 0.05;
/// Upper bound for any dimension after the final clamp.
pub const DIM_MAX: f32 = 0.95;

/// The seven taste dimensions, in canonical iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Adventure,
    Culture,
    Luxury,
    Food,
    Nature,
    Urban,
    Budget,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Adventure,
        Dimension::Culture,
        Dimension::Luxury,
        Dimension::Food,
        Dimension::Nature,
        Dimension::Urban,
        Dimension::Budget,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Dimension::Adventure => "adventure",
            Dimension::Culture => "culture",
            Dimension::Luxury => "luxury",
            Dimension::Food => "food",
            Dimension::Nature => "nature",
            Dimension::Urban => "urban",
            Dimension::Budget => "budget",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "adventure" => Some(Dimension::Adventure),
            "culture" => Some(Dimension::Culture),
            "luxury" => Some(Dimension::Luxury),
            "food" => Some(Dimension::Food),
            "nature" => Some(Dimension::Nature),
            "urban" => Some(Dimension::Urban),
            "budget" => Some(Dimension::Budget),
            _ => None,
        }
    }
}

/// 7-dimensional numeric profile summarizing travel-content affinity.
/// `budget` reads as budget-consciousness: high ⇒ favors cheap travel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TasteVector {
    pub adventure: f32,
    pub culture: f32,
    pub luxury: f32,
    pub food: f32,
    pub nature: f32,
    pub urban: f32,
    pub budget: f32,
}

impl TasteVector {
    /// Mild defaults the builder starts from. Urban and budget lean above the
    /// midpoint: most creator sites skew city-based and cost-aware.
    pub fn base() -> Self {
        Self {
            adventure: 0.30,
            culture: 0.30,
            luxury: 0.20,
            food: 0.25,
            nature: 0.25,
            urban: 0.40,
            budget: 0.60,
        }
    }

    pub fn get(&self, d: Dimension) -> f32 {
        match d {
            Dimension::Adventure => self.adventure,
            Dimension::Culture => self.culture,
            Dimension::Luxury => self.luxury,
            Dimension::Food => self.food,
            Dimension::Nature => self.nature,
            Dimension::Urban => self.urban,
            Dimension::Budget => self.budget,
        }
    }

    fn get_mut(&mut self, d: Dimension) -> &mut f32 {
        match d {
            Dimension::Adventure => &mut self.adventure,
            Dimension::Culture => &mut self.culture,
            Dimension::Luxury => &mut self.luxury,
            Dimension::Food => &mut self.food,
            Dimension::Nature => &mut self.nature,
            Dimension::Urban => &mut self.urban,
            Dimension::Budget => &mut self.budget,
        }
    }

    /// One accumulation step. Saturates into [0.0, 1.0] immediately; the
    /// intermediate clamp is what makes signal order part of the contract.
    pub(crate) fn bump(&mut self, d: Dimension, delta: f32) {
        let slot = self.get_mut(d);
        *slot = (*slot + delta).clamp(0.0, 1.0);
    }

    /// Final range clamp, applied exactly once by the builder.
    pub(crate) fn clamp_final(mut self) -> Self {
        for d in Dimension::ALL {
            let slot = self.get_mut(d);
            *slot = slot.clamp(DIM_MIN, DIM_MAX);
        }
        self
    }

    /// True when every dimension sits inside the published range.
    pub fn in_range(&self) -> bool {
        Dimension::ALL
            .iter()
            .all(|&d| (DIM_MIN..=DIM_MAX).contains(&self.get(d)))
    }
}
