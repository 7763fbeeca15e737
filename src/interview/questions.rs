// src/interview/questions.rs
//! The four-question trip interview.
//!
//! Question order is fixed (duration, budget, content format, climate) and
//! option sets are built against the live context: budget ranges follow the
//! detected currency, content-format options reorder toward the creator's
//! declared content type. `apply_answer` is pure; rejection returns the
//! reason and leaves the caller's context untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use strsim::normalized_levenshtein;

use crate::currency;
use crate::interview::context::QuestionContext;

pub const QUESTION_COUNT: u8 = 4;
const QUESTION_IDS: [&str; QUESTION_COUNT as usize] =
    ["duration", "budget", "contentFormat", "climate"];

/// Totals below this face value are rejected outright.
const MIN_TOTAL_BUDGET: f32 = 50.0;
/// Daily budgets below this are rejected; a shorter trip or bigger budget is
/// suggested instead.
const MIN_DAILY_BUDGET: f32 = 30.0;
/// Daily budgets below this (but above the floor) get a budget-travel
/// advisory.
const ADVISORY_DAILY_BUDGET: f32 = 50.0;

/// Free-text answers at or above this similarity snap to the offered option.
const OPTION_SNAP_SIMILARITY: f64 = 0.85;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// 1-based position in the interview.
    pub number: u8,
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
}

/// Outcome of applying one answer. Acceptance variants carry the updated
/// context; rejection carries only the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum AnswerOutcome {
    Accepted {
        context: QuestionContext,
    },
    AcceptedWithAdvisory {
        context: QuestionContext,
        advisory: String,
    },
    Rejected {
        reason: String,
    },
}

/// Question `number` (1-based) for this context, or `None` once the
/// interview is complete.
pub fn next_question(ctx: &QuestionContext, number: u8) -> Option<Question> {
    if number == 0 || number > QUESTION_COUNT {
        return None;
    }
    let id = QUESTION_IDS[(number - 1) as usize];
    let (text, options) = match id {
        "duration" => (
            "How long do you want to travel?".to_string(),
            vec![
                "3-5 days".to_string(),
                "1 week".to_string(),
                "2 weeks".to_string(),
                "1 month".to_string(),
            ],
        ),
        "budget" => {
            let cur = ctx.active_currency();
            (
                format!("What's your total budget for this trip ({})?", cur.code),
                currency::budget_option_ranges(cur),
            )
        }
        "contentFormat" => (
            "What format do you create most?".to_string(),
            content_format_options(ctx.content_type.as_deref()),
        ),
        "climate" => (
            "Which climate do you prefer?".to_string(),
            vec![
                "Tropical".to_string(),
                "Mediterranean".to_string(),
                "Alpine & cool".to_string(),
                "No preference".to_string(),
            ],
        ),
        _ => return None,
    };
    Some(Question {
        number,
        id: id.to_string(),
        text,
        options,
    })
}

pub fn is_complete(ctx: &QuestionContext) -> bool {
    QUESTION_IDS.iter().all(|id| ctx.answered(id).is_some())
}

/// Fixed format options, reordered so the closest match to the declared
/// content type comes first. Stable for ties and for unknown types.
fn content_format_options(content_type: Option<&str>) -> Vec<String> {
    let mut options = vec![
        "Long-form video".to_string(),
        "Short-form video".to_string(),
        "Photography & carousels".to_string(),
        "Written guides & blogs".to_string(),
    ];
    if let Some(ct) = content_type {
        let needle = ct.to_lowercase();
        options.sort_by(|a, b| {
            let sa = normalized_levenshtein(&needle, &a.to_lowercase());
            let sb = normalized_levenshtein(&needle, &b.to_lowercase());
            sb.total_cmp(&sa)
        });
    }
    options
}

/// Apply one answer. Never mutates `ctx`; acceptance returns a new context.
pub fn apply_answer(ctx: &QuestionContext, question_id: &str, answer: &str) -> AnswerOutcome {
    let answer = answer.trim();
    if answer.is_empty() {
        return AnswerOutcome::Rejected {
            reason: "Answer was empty.".to_string(),
        };
    }

    match question_id {
        "duration" => apply_duration(ctx, answer),
        "budget" => apply_budget(ctx, answer),
        "contentFormat" => apply_choice(ctx, "contentFormat", answer),
        "climate" => apply_choice(ctx, "climate", answer),
        other => AnswerOutcome::Rejected {
            reason: format!("Unknown question \"{other}\"."),
        },
    }
}

fn apply_duration(ctx: &QuestionContext, answer: &str) -> AnswerOutcome {
    let days = parse_duration_days(answer);
    let mut next = ctx.clone();
    next.duration_days = Some(days);
    next.recompute_daily_budget();

    match check_daily_budget(&next) {
        DailyCheck::TooLow(daily) => AnswerOutcome::Rejected {
            reason: format!(
                "That works out to about {} per day, below a workable floor. Try a shorter trip or a higher budget.",
                currency::format_face(daily, next.active_currency())
            ),
        },
        check => {
            next.record_answer("duration", answer);
            accept(next, check)
        }
    }
}

fn apply_budget(ctx: &QuestionContext, answer: &str) -> AnswerOutcome {
    let Some(parsed) = currency::parse_amount(answer) else {
        return AnswerOutcome::Rejected {
            reason: "Couldn't read an amount. Try something like \"$1,500\".".to_string(),
        };
    };
    if parsed.amount < MIN_TOTAL_BUDGET {
        return AnswerOutcome::Rejected {
            reason: format!(
                "A total budget below {MIN_TOTAL_BUDGET:.0} won't cover a creator trip. Enter your full trip budget."
            ),
        };
    }

    let mut next = ctx.clone();
    next.budget = Some(parsed.amount);
    next.currency = Some(
        parsed
            .currency
            .map(|c| c.code.to_string())
            .unwrap_or_else(|| ctx.active_currency().code.to_string()),
    );
    next.recompute_daily_budget();

    match check_daily_budget(&next) {
        DailyCheck::TooLow(daily) => AnswerOutcome::Rejected {
            reason: format!(
                "That works out to about {} per day, below a workable floor. Try a shorter trip or a higher budget.",
                currency::format_face(daily, next.active_currency())
            ),
        },
        check => {
            next.record_answer("budget", answer);
            accept(next, check)
        }
    }
}

/// Choice questions: snap near-matches to the offered option text, accept
/// anything else verbatim.
fn apply_choice(ctx: &QuestionContext, id: &str, answer: &str) -> AnswerOutcome {
    let canonical = next_question(ctx, question_number(id))
        .map(|q| q.options)
        .unwrap_or_default()
        .into_iter()
        .find(|opt| {
            normalized_levenshtein(&opt.to_lowercase(), &answer.to_lowercase())
                >= OPTION_SNAP_SIMILARITY
        })
        .unwrap_or_else(|| answer.to_string());

    let mut next = ctx.clone();
    next.record_answer(id, &canonical);
    AnswerOutcome::Accepted { context: next }
}

fn question_number(id: &str) -> u8 {
    QUESTION_IDS
        .iter()
        .position(|q| *q == id)
        .map(|i| (i + 1) as u8)
        .unwrap_or(0)
}

enum DailyCheck {
    Fine,
    Advisory(f32),
    TooLow(f32),
}

fn check_daily_budget(ctx: &QuestionContext) -> DailyCheck {
    match ctx.daily_budget {
        Some(daily) if daily < MIN_DAILY_BUDGET => DailyCheck::TooLow(daily),
        Some(daily) if daily < ADVISORY_DAILY_BUDGET => DailyCheck::Advisory(daily),
        _ => DailyCheck::Fine,
    }
}

fn accept(context: QuestionContext, check: DailyCheck) -> AnswerOutcome {
    match check {
        DailyCheck::Advisory(daily) => {
            let advisory = format!(
                "About {} per day is budget-travel territory. Expect hostels, street food and slower transit.",
                currency::format_face(daily, context.active_currency())
            );
            AnswerOutcome::AcceptedWithAdvisory { context, advisory }
        }
        _ => AnswerOutcome::Accepted { context },
    }
}

static RE_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)?\s*(day|week|month)|(\d+)").expect("duration regex"));

/// "2 weeks" → 14, "a week" → 7, "10" → 10, anything unreadable → 1.
pub fn parse_duration_days(answer: &str) -> u32 {
    let Some(caps) = RE_DURATION.captures(answer) else {
        return 1;
    };
    if let Some(unit) = caps.get(2) {
        let count: u32 = caps
            .get(1)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(1);
        let factor = match unit.as_str().to_lowercase().as_str() {
            "week" => 7,
            "month" => 30,
            _ => 1,
        };
        count.saturating_mul(factor).max(1)
    } else if let Some(bare) = caps.get(3) {
        bare.as_str().parse().unwrap_or(1).max(1)
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> QuestionContext {
        QuestionContext::default()
    }

    fn unwrap_accepted(outcome: AnswerOutcome) -> QuestionContext {
        match outcome {
            AnswerOutcome::Accepted { context } => context,
            AnswerOutcome::AcceptedWithAdvisory { context, .. } => context,
            AnswerOutcome::Rejected { reason } => panic!("rejected: {reason}"),
        }
    }

    #[test]
    fn duration_parsing_variants() {
        assert_eq!(parse_duration_days("7 days"), 7);
        assert_eq!(parse_duration_days("2 weeks"), 14);
        assert_eq!(parse_duration_days("1 month"), 30);
        assert_eq!(parse_duration_days("a week"), 7);
        assert_eq!(parse_duration_days("10"), 10);
        assert_eq!(parse_duration_days("flexible, honestly"), 1);
    }

    #[test]
    fn four_questions_in_fixed_order_then_none() {
        let c = ctx();
        let ids: Vec<String> = (1..=5)
            .filter_map(|n| next_question(&c, n).map(|q| q.id))
            .collect();
        assert_eq!(ids, vec!["duration", "budget", "contentFormat", "climate"]);
        assert!(next_question(&c, 5).is_none());
        assert!(next_question(&c, 0).is_none());
    }

    #[test]
    fn budget_options_follow_audience_currency() {
        let c = QuestionContext {
            audience_location: Some("Mumbai, India".into()),
            ..Default::default()
        };
        let q = next_question(&c, 2).unwrap();
        assert!(q.text.contains("INR"));
        assert!(q.options[0].starts_with('₹'));
    }

    #[test]
    fn tiny_total_budget_rejected_before_application() {
        let c = ctx();
        let outcome = apply_answer(&c, "budget", "$45");
        assert!(matches!(outcome, AnswerOutcome::Rejected { .. }));
    }

    #[test]
    fn low_daily_budget_rejected_and_context_untouched() {
        let c = unwrap_accepted(apply_answer(&ctx(), "duration", "7 days"));
        let outcome = apply_answer(&c, "budget", "$100");
        match outcome {
            AnswerOutcome::Rejected { reason } => {
                assert!(reason.contains("per day"), "reason: {reason}");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        // Rejection did not leak into the caller's context.
        assert_eq!(c.budget, None);
        assert_eq!(c.answered("budget"), None);
    }

    #[test]
    fn comfortable_budget_accepted() {
        let c = unwrap_accepted(apply_answer(&ctx(), "duration", "7 days"));
        let c = unwrap_accepted(apply_answer(&c, "budget", "$1000"));
        assert_eq!(c.budget, Some(1000.0));
        assert_eq!(c.daily_budget, Some(142.0));
    }

    #[test]
    fn advisory_band_between_thirty_and_fifty_per_day() {
        let c = unwrap_accepted(apply_answer(&ctx(), "duration", "7 days"));
        let outcome = apply_answer(&c, "budget", "$250");
        match outcome {
            AnswerOutcome::AcceptedWithAdvisory { context, advisory } => {
                assert_eq!(context.daily_budget, Some(35.0));
                assert!(advisory.contains("budget-travel"));
            }
            other => panic!("expected advisory, got {other:?}"),
        }
    }

    #[test]
    fn daily_budget_commutes_over_answer_order() {
        let a = unwrap_accepted(apply_answer(&ctx(), "duration", "2 weeks"));
        let a = unwrap_accepted(apply_answer(&a, "budget", "$2000"));

        let b = unwrap_accepted(apply_answer(&ctx(), "budget", "$2000"));
        let b = unwrap_accepted(apply_answer(&b, "duration", "2 weeks"));

        assert_eq!(a.daily_budget, b.daily_budget);
        assert_eq!(a.daily_budget, Some(142.0));
    }

    #[test]
    fn revised_duration_can_reject_against_existing_budget() {
        let c = unwrap_accepted(apply_answer(&ctx(), "budget", "$200"));
        let outcome = apply_answer(&c, "duration", "1 month");
        assert!(matches!(outcome, AnswerOutcome::Rejected { .. }));
    }

    #[test]
    fn choice_answers_snap_to_options() {
        let c = ctx();
        let out = unwrap_accepted(apply_answer(&c, "climate", "tropcal"));
        assert_eq!(out.answered("climate"), Some("Tropical"));

        let out = unwrap_accepted(apply_answer(&c, "climate", "somewhere snowy"));
        assert_eq!(out.answered("climate"), Some("somewhere snowy"));
    }

    #[test]
    fn content_format_options_reorder_toward_declared_type() {
        let c = QuestionContext {
            content_type: Some("Photography & Visual Arts".into()),
            ..Default::default()
        };
        let q = next_question(&c, 3).unwrap();
        assert_eq!(q.options[0], "Photography & carousels");
    }

    #[test]
    fn interview_completes_after_four_answers() {
        let mut c = ctx();
        for (id, answer) in [
            ("duration", "1 week"),
            ("budget", "$1500"),
            ("contentFormat", "Short-form video"),
            ("climate", "No preference"),
        ] {
            c = unwrap_accepted(apply_answer(&c, id, answer));
        }
        assert!(is_complete(&c));
    }
}
