// src/scoring/weights.rs
//! Composite-score factor weights. Fixed at compile time; the five factors
//! must sum to 1.0 so the weighted sum stays a valid [0, 1] score before the
//! theme bonus.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub taste_affinity: f32,
    pub community_engagement: f32,
    pub brand_fit: f32,
    pub budget_alignment: f32,
    pub collaboration_potential: f32,
}

pub const WEIGHTS: FactorWeights = FactorWeights {
    taste_affinity: 0.45,
    community_engagement: 0.25,
    brand_fit: 0.15,
    budget_alignment: 0.10,
    collaboration_potential: 0.05,
};

impl FactorWeights {
    pub fn sum(&self) -> f32 {
        self.taste_affinity
            + self.community_engagement
            + self.brand_fit
            + self.budget_alignment
            + self.collaboration_potential
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        assert!(
            (WEIGHTS.sum() - 1.0).abs() < 1e-6,
            "factor weights sum to {}, expected 1.0",
            WEIGHTS.sum()
        );
    }

    #[test]
    fn taste_affinity_dominates() {
        assert!(WEIGHTS.taste_affinity > WEIGHTS.community_engagement);
        assert!(WEIGHTS.collaboration_potential < WEIGHTS.budget_alignment);
    }
}
