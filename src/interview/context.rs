// src/interview/context.rs
//! Interview context: read-only profile inputs plus the budget/duration
//! state the four questions accumulate.

use serde::{Deserialize, Serialize};

use crate::currency::{self, Currency};
use crate::profile::{SocialLink, WebsiteProfile};

/// One recorded answer. The answer log is append-only; the latest entry per
/// question id wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionContext {
    // Profile inputs, read-only for the interview's lifetime.
    pub themes: Vec<String>,
    pub content_type: Option<String>,
    pub hints: Vec<String>,
    pub social_links: Vec<SocialLink>,
    pub audience_location: Option<String>,

    // Derived trip state.
    pub budget: Option<f32>,
    /// ISO currency code of `budget`.
    pub currency: Option<String>,
    pub duration_days: Option<u32>,
    /// Always `floor(budget / duration_days)`; recomputed, never assigned
    /// independently.
    pub daily_budget: Option<f32>,

    pub previous_answers: Vec<Answer>,
}

impl QuestionContext {
    pub fn from_profile(profile: &WebsiteProfile) -> Self {
        Self {
            themes: profile.themes.clone(),
            content_type: profile.content_type.clone(),
            hints: profile.hints.clone(),
            social_links: profile.social_links.clone(),
            audience_location: profile.audience_location.clone(),
            ..Default::default()
        }
    }

    /// Latest answer for a question id, if any.
    pub fn answered(&self, id: &str) -> Option<&str> {
        self.previous_answers
            .iter()
            .rev()
            .find(|a| a.id == id)
            .map(|a| a.answer.as_str())
    }

    pub fn record_answer(&mut self, id: &str, answer: &str) {
        self.previous_answers.push(Answer {
            id: id.to_string(),
            answer: answer.to_string(),
        });
    }

    /// Currency in effect: the budget answer's currency when one was parsed,
    /// otherwise whatever the audience location implies.
    pub fn active_currency(&self) -> &'static Currency {
        if let Some(code) = self.currency.as_deref() {
            if let Some(c) = currency::by_code(code) {
                return c;
            }
        }
        currency::detect_locale(self.audience_location.as_deref()).currency
    }

    /// Re-derive the daily budget from budget and duration. Called after
    /// every mutation of either; keeps answer order irrelevant.
    pub fn recompute_daily_budget(&mut self) {
        self.daily_budget = match (self.budget, self.duration_days) {
            (Some(b), Some(d)) if d > 0 => Some((b / d as f32).floor()),
            _ => None,
        };
    }

    /// Daily budget converted to USD for the scorer.
    pub fn daily_budget_usd(&self) -> Option<f32> {
        self.daily_budget
            .map(|daily| currency::to_usd(daily, self.active_currency()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_answer_wins() {
        let mut ctx = QuestionContext::default();
        ctx.record_answer("climate", "Tropical");
        ctx.record_answer("climate", "Alpine & cool");
        assert_eq!(ctx.answered("climate"), Some("Alpine & cool"));
        assert_eq!(ctx.previous_answers.len(), 2);
    }

    #[test]
    fn daily_budget_is_floored_quotient() {
        let mut ctx = QuestionContext {
            budget: Some(1000.0),
            duration_days: Some(7),
            ..Default::default()
        };
        ctx.recompute_daily_budget();
        assert_eq!(ctx.daily_budget, Some(142.0));
    }

    #[test]
    fn daily_budget_clears_when_duration_missing() {
        let mut ctx = QuestionContext {
            budget: Some(1000.0),
            ..Default::default()
        };
        ctx.recompute_daily_budget();
        assert_eq!(ctx.daily_budget, None);
    }

    #[test]
    fn active_currency_prefers_answer_over_location() {
        let ctx = QuestionContext {
            currency: Some("EUR".into()),
            audience_location: Some("India".into()),
            ..Default::default()
        };
        assert_eq!(ctx.active_currency().code, "EUR");

        let ctx = QuestionContext {
            audience_location: Some("India".into()),
            ..Default::default()
        };
        assert_eq!(ctx.active_currency().code, "INR");
    }
}
