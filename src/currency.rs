// src/currency.rs
//! Unified currency/locale service.
//!
//! One table backs every call site that reasons about money or region: the
//! interview's budget-option generator, budget-answer parsing, the scorer's
//! budget-alignment tier, and the audience-location taste signal. Keeping
//! these in one place stops the option generator and the scorer from drifting
//! apart on what "the detected currency" means.

use once_cell::sync::Lazy;
use regex::Regex;

/// A supported display currency. `face_scale` converts the USD-denominated
/// option tiers into locally sensible face values; `usd_per_unit` converts a
/// face amount back to USD for cost-tier comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub usd_per_unit: f32,
    pub face_scale: f32,
}

pub const USD: Currency = Currency {
    code: "USD",
    symbol: "$",
    usd_per_unit: 1.0,
    face_scale: 1.0,
};
pub const EUR: Currency = Currency {
    code: "EUR",
    symbol: "€",
    usd_per_unit: 1.08,
    face_scale: 1.0,
};
pub const GBP: Currency = Currency {
    code: "GBP",
    symbol: "£",
    usd_per_unit: 1.27,
    face_scale: 1.0,
};
pub const INR: Currency = Currency {
    code: "INR",
    symbol: "₹",
    usd_per_unit: 0.012,
    face_scale: 80.0,
};
pub const JPY: Currency = Currency {
    code: "JPY",
    symbol: "¥",
    usd_per_unit: 0.0067,
    face_scale: 150.0,
};
pub const AUD: Currency = Currency {
    code: "AUD",
    symbol: "A$",
    usd_per_unit: 0.66,
    face_scale: 1.5,
};
pub const CAD: Currency = Currency {
    code: "CAD",
    symbol: "C$",
    usd_per_unit: 0.73,
    face_scale: 1.4,
};

const ALL: [&Currency; 7] = [&USD, &EUR, &GBP, &INR, &JPY, &AUD, &CAD];

pub fn by_code(code: &str) -> Option<&'static Currency> {
    ALL.iter().find(|c| c.code.eq_ignore_ascii_case(code)).copied()
}

fn by_symbol(sym: &str) -> Option<&'static Currency> {
    // Longest symbols first so "A$"/"C$" win over "$".
    match sym {
        "A$" => Some(&AUD),
        "C$" => Some(&CAD),
        "$" => Some(&USD),
        "€" => Some(&EUR),
        "£" => Some(&GBP),
        "₹" => Some(&INR),
        "¥" => Some(&JPY),
        _ => None,
    }
}

/// Audience spending-power tier, fed into the audience-location taste signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingTier {
    High,
    Emerging,
}

/// What the locale table derived from a free-text audience location.
#[derive(Debug, Clone, Copy)]
pub struct LocaleProfile {
    pub currency: &'static Currency,
    pub tier: Option<SpendingTier>,
}

impl Default for LocaleProfile {
    fn default() -> Self {
        Self {
            currency: &USD,
            tier: None,
        }
    }
}

/// Detect currency + spending tier from an audience-location string.
/// Substring heuristic over lowercased text; unknown locations fall back to
/// USD with no tier.
pub fn detect_locale(location: Option<&str>) -> LocaleProfile {
    let Some(raw) = location else {
        return LocaleProfile::default();
    };
    let loc = raw.trim().to_lowercase();
    if loc.is_empty() {
        return LocaleProfile::default();
    }

    let hit = |needles: &[&str]| needles.iter().any(|n| loc.contains(n));

    if hit(&["united states", "usa", "u.s.", "america"]) || loc == "us" {
        return profile(&USD, SpendingTier::High);
    }
    if hit(&["united kingdom", "britain", "england", "scotland", "wales"]) || loc == "uk" {
        return profile(&GBP, SpendingTier::High);
    }
    if hit(&[
        "germany", "france", "spain", "italy", "netherlands", "austria", "portugal", "ireland",
        "belgium", "europe",
    ]) {
        return profile(&EUR, SpendingTier::High);
    }
    if hit(&["india"]) {
        return profile(&INR, SpendingTier::Emerging);
    }
    if hit(&["japan"]) {
        return profile(&JPY, SpendingTier::High);
    }
    if hit(&["australia", "new zealand"]) {
        return profile(&AUD, SpendingTier::High);
    }
    if hit(&["canada"]) {
        return profile(&CAD, SpendingTier::High);
    }
    if hit(&[
        "brazil", "mexico", "indonesia", "philippines", "vietnam", "thailand", "colombia",
        "argentina", "nigeria", "kenya", "south africa",
    ]) {
        return LocaleProfile {
            currency: &USD,
            tier: Some(SpendingTier::Emerging),
        };
    }

    LocaleProfile::default()
}

fn profile(c: &'static Currency, tier: SpendingTier) -> LocaleProfile {
    LocaleProfile {
        currency: c,
        tier: Some(tier),
    }
}

/// A parsed money answer: face amount in the answer's own currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedAmount {
    pub amount: f32,
    /// `None` when the answer carried a bare number; caller substitutes the
    /// detected locale currency.
    pub currency: Option<&'static Currency>,
}

static RE_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    // Leading symbol or 3-letter code, then digits with optional separators.
    Regex::new(r"(?i)^\s*(?P<cur>A\$|C\$|[$€£₹¥]|[A-Z]{3})?\s*(?P<num>\d[\d,_ ]*(?:\.\d+)?)")
        .expect("amount regex")
});

/// Parse a leading currency marker and numeric amount from an answer string.
/// `"$1,000"` → 1000 USD, `"EUR 800"` → 800 EUR, `"2500"` → 2500 (no currency).
pub fn parse_amount(answer: &str) -> Option<ParsedAmount> {
    let caps = RE_AMOUNT.captures(answer)?;
    let num = caps.name("num")?.as_str().replace([',', '_', ' '], "");
    let amount: f32 = num.parse().ok()?;
    let currency = caps.name("cur").and_then(|m| {
        let s = m.as_str();
        by_symbol(s).or_else(|| by_code(s))
    });
    Some(ParsedAmount { amount, currency })
}

pub fn to_usd(amount: f32, currency: &Currency) -> f32 {
    amount * currency.usd_per_unit
}

pub fn from_usd(amount_usd: f32, currency: &Currency) -> f32 {
    amount_usd / currency.usd_per_unit
}

/// Format a face value with thousands separators and the currency symbol.
pub fn format_face(amount: f32, currency: &Currency) -> String {
    let n = amount.round() as i64;
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if n < 0 { "-" } else { "" };
    format!("{}{}{}", sign, currency.symbol, grouped)
}

/// Trip-budget option tiers, USD-denominated and scaled per currency.
/// The interview's budget question renders exactly these.
pub fn budget_option_ranges(currency: &Currency) -> Vec<String> {
    const TIERS_USD: [(f32, Option<f32>); 4] = [
        (500.0, Some(1_000.0)),
        (1_000.0, Some(2_500.0)),
        (2_500.0, Some(5_000.0)),
        (5_000.0, None),
    ];
    TIERS_USD
        .iter()
        .map(|(lo, hi)| {
            let lo_face = lo * currency.face_scale;
            match hi {
                Some(hi) => format!(
                    "{} – {}",
                    format_face(lo_face, currency),
                    format_face(hi * currency.face_scale, currency)
                ),
                None => format!("{}+", format_face(lo_face, currency)),
            }
        })
        .collect()
}

/// Daily-spend tier used by the scorer's budget-alignment factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostTier {
    Budget,
    Mid,
    Premium,
}

const BUDGET_TIER_MAX_USD: f32 = 60.0;
const PREMIUM_TIER_MIN_USD: f32 = 200.0;

pub fn cost_tier(daily_usd: f32) -> CostTier {
    if daily_usd < BUDGET_TIER_MAX_USD {
        CostTier::Budget
    } else if daily_usd > PREMIUM_TIER_MIN_USD {
        CostTier::Premium
    } else {
        CostTier::Mid
    }
}
