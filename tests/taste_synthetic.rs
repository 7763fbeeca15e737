//! Synthetic taste-derivation suite (≈100–130 programmatically built creator
//! profiles).
//! Run with: cargo test --test taste_synthetic -- --ignored --nocapture
//! Env toggles:
//!   SHOW_VECTORS=1   -> print the derived vector per row

use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use std::fmt::Write as _;

use wandermatch::taste::{
    derive_taste, Dimension, TasteVector, CONFIDENCE_MAX, CONFIDENCE_MIN,
};
use wandermatch::WebsiteProfile;

/// A raised dimension must clear its base value by at least this much.
const EPS: f32 = 0.05;

#[derive(Clone)]
struct Case {
    profile: WebsiteProfile,
    /// Dimension this profile is built to raise; `None` for pure noise.
    target: Option<Dimension>,
    expect_raise: bool,
    why: &'static str,
}

/* ----------------------------
Thematic pools
---------------------------- */

// Each pool hits exactly one taxonomy category; phrases are chosen so no
// stray substring lands in a second category.
const ADVENTURE: &[&str] = &[
    "hiking weekends",
    "rock climbing",
    "kayak expeditions",
    "camping gear tests",
    "surf sessions",
];
const CULTURE: &[&str] = &[
    "museum tours",
    "heritage walks",
    "architecture spotting",
    "festival calendars",
];
const LUXURY: &[&str] = &[
    "five-star suites",
    "premium lounges",
    "exclusive villas",
    "spa escapes",
];
const FOOD: &[&str] = &[
    "street food stalls",
    "coffee tasting",
    "wine pairings",
    "restaurant reviews",
];
const NATURE: &[&str] = &[
    "wildlife safaris",
    "waterfall chasing",
    "national park visits",
    "island hopping",
];
const URBAN: &[&str] = &[
    "nightlife guides",
    "rooftop bars",
    "skyline views",
    "city break ideas",
];
const BUDGET: &[&str] = &[
    "backpacking routes",
    "hostel living",
    "shoestring itineraries",
    "cheap sleeps",
];

// Strings with no taxonomy keyword anywhere, even as a substring.
const NOISE: &[&str] = &[
    "celebrity gossip roundup",
    "football transfer rumours",
    "crossword puzzle archive",
    "board game scoring",
    "chess opening theory",
    "knitting pattern releases",
    "home plumbing fixes",
];

const POOLS: &[(&[&str], Dimension)] = &[
    (ADVENTURE, Dimension::Adventure),
    (CULTURE, Dimension::Culture),
    (LUXURY, Dimension::Luxury),
    (FOOD, Dimension::Food),
    (NATURE, Dimension::Nature),
    (URBAN, Dimension::Urban),
    (BUDGET, Dimension::Budget),
];

fn themed(url: &str, themes: &[&str]) -> WebsiteProfile {
    WebsiteProfile {
        url: url.to_string(),
        themes: themes.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

/* ----------------------------
Case builder
---------------------------- */

/// Build ~100–130 mixed cases: single-theme raises, content-type reinforced
/// profiles, hint-only profiles, antagonist axes, pure noise and a seeded
/// randomized batch.
fn build_cases() -> Vec<Case> {
    let mut out = Vec::new();

    // 1) One theme per case: the pool's dimension must rise.
    for (pool, dim) in POOLS {
        for &theme in *pool {
            out.push(Case {
                profile: themed("https://solo.example", &[theme]),
                target: Some(*dim),
                expect_raise: true,
                why: "single pool theme",
            });
        }
    }

    // 2) Theme + matching declared content type => reinforced raise.
    let reinforced: &[(&[&str], &str, Dimension)] = &[
        (ADVENTURE, "Travel & Adventure", Dimension::Adventure),
        (LUXURY, "Luxury Lifestyle", Dimension::Luxury),
        (FOOD, "Food & Culinary", Dimension::Food),
        (BUDGET, "Budget Travel", Dimension::Budget),
        (CULTURE, "Culture & History", Dimension::Culture),
    ];
    for (pool, ct, dim) in reinforced {
        for &theme in pool.iter().take(2) {
            let mut p = themed("https://typed.example", &[theme]);
            p.content_type = Some(ct.to_string());
            out.push(Case {
                profile: p,
                target: Some(*dim),
                expect_raise: true,
                why: "theme + content type",
            });
        }
    }

    // 3) Hint-only profiles: reduced weight, still a visible raise.
    for (pool, dim) in POOLS {
        out.push(Case {
            profile: WebsiteProfile {
                url: "https://hinted.example".into(),
                hints: vec![pool[0].to_string()],
                ..Default::default()
            },
            target: Some(*dim),
            expect_raise: true,
            why: "hint only",
        });
    }

    // 4) Antagonist axes: luxury input pushes budget down, and vice versa,
    //    so the opposing dimension must NOT read as raised.
    for &theme in LUXURY {
        out.push(Case {
            profile: themed("https://gilded.example", &[theme]),
            target: Some(Dimension::Budget),
            expect_raise: false,
            why: "luxury suppresses budget",
        });
    }
    for &theme in BUDGET {
        out.push(Case {
            profile: themed("https://frugal.example", &[theme]),
            target: Some(Dimension::Luxury),
            expect_raise: false,
            why: "budget suppresses luxury",
        });
    }

    // 5) Pure noise: nothing matches, the vector must sit on its base.
    for &topic in NOISE {
        out.push(Case {
            profile: themed("https://offtopic.example", &[topic]),
            target: None,
            expect_raise: false,
            why: "no taxonomy hit",
        });
    }

    // 6) Randomized batch around pool/noise mixes (seeded for determinism).
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let (pool, dim) = POOLS.choose(&mut rng).unwrap();
        let noise = *NOISE.choose(&mut rng).unwrap();
        let flip: bool = rng.random_bool(0.7); // 70% themed, 30% noise-only
        if flip {
            let a = *pool.choose(&mut rng).unwrap();
            let b = *pool.choose(&mut rng).unwrap();
            out.push(Case {
                profile: themed("https://mixed.example", &[a, b, noise]),
                target: Some(*dim),
                expect_raise: true,
                why: "themed with noise",
            });
        } else {
            out.push(Case {
                profile: themed("https://mixed.example", &[noise]),
                target: None,
                expect_raise: false,
                why: "mostly noise",
            });
        }
    }

    out.truncate(130);
    out
}

/// Did the case's target dimension (or, for noise, any dimension) move up
/// from the base vector by more than `EPS`?
fn raised(vector: &TasteVector, target: Option<Dimension>) -> bool {
    let base = TasteVector::base();
    match target {
        Some(d) => vector.get(d) - base.get(d) > EPS,
        None => Dimension::ALL
            .iter()
            .any(|&d| (vector.get(d) - base.get(d)).abs() > EPS),
    }
}

#[test]
fn synthetic_profiles_respect_vector_and_confidence_ranges() {
    for (i, c) in build_cases().iter().enumerate() {
        let tp = derive_taste(&c.profile);
        assert!(
            tp.vector.in_range(),
            "case {i} ({}) produced an out-of-range vector: {:?}",
            c.why,
            tp.vector
        );
        assert!(
            (CONFIDENCE_MIN..=CONFIDENCE_MAX).contains(&tp.confidence),
            "case {i} ({}) confidence out of range: {}",
            c.why,
            tp.confidence
        );
    }
}

#[test]
#[ignore] // run manually: cargo test --test taste_synthetic -- --ignored --nocapture
fn synthetic_taste_suite() {
    let cases = build_cases();

    let mut ok = 0usize;
    let mut fail = 0usize;

    let mut tp_ = 0usize; // expect_raise && raised
    let mut tn = 0usize; // !expect_raise && !raised
    let mut fp = 0usize; // !expect_raise && raised
    let mut fn_ = 0usize; // expect_raise && !raised

    let show_vectors = std::env::var("SHOW_VECTORS").ok().as_deref() == Some("1");

    let mut buf = String::new();
    writeln!(
        &mut buf,
        "{:<4} | {:<6} | {:<6} | {:<9} | {:<5} | {}",
        "Idx", "Expect", "Got", "Target", "Conf", "Why"
    )
    .unwrap();
    writeln!(&mut buf, "{}", "-".repeat(100)).unwrap();

    for (i, c) in cases.iter().enumerate() {
        let derived = derive_taste(&c.profile);
        let got = raised(&derived.vector, c.target);
        let got_str = if got { "raise" } else { "flat" };
        let expect_str = if c.expect_raise { "raise" } else { "flat" };

        if got == c.expect_raise {
            ok += 1;
        } else {
            fail += 1;
        }

        match (c.expect_raise, got) {
            (true, true) => tp_ += 1,
            (false, false) => tn += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
        }

        let target_cell = c.target.map(|d| d.key()).unwrap_or("-");
        writeln!(
            &mut buf,
            "{:<4} | {:<6} | {:<6} | {:<9} | {:<5.2} | {}",
            i, expect_str, got_str, target_cell, derived.confidence, c.why
        )
        .unwrap();
        if show_vectors {
            writeln!(&mut buf, "      {:?}", derived.vector).unwrap();
        }
    }

    let total = cases.len();
    let accuracy = ok as f32 / total as f32;

    let precision = if tp_ + fp > 0 {
        tp_ as f32 / (tp_ + fp) as f32
    } else {
        0.0
    };
    let recall = if tp_ + fn_ > 0 {
        tp_ as f32 / (tp_ + fn_) as f32
    } else {
        0.0
    };
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    println!(
        "\n{}\nTotal: {}  OK: {}  FAIL: {}\nTP: {}  TN: {}  FP: {}  FN: {}\n\
         Accuracy: {:.1}%  Precision: {:.1}%  Recall: {:.1}%  F1: {:.1}%\n",
        buf,
        total,
        ok,
        fail,
        tp_,
        tn,
        fp,
        fn_,
        100.0 * accuracy,
        100.0 * precision,
        100.0 * recall,
        100.0 * f1
    );

    // Strict criterion: want at least 85% match (tweak as needed)
    assert!(
        accuracy >= 0.85,
        "Synthetic suite accuracy {:.1}% below threshold (85%)",
        100.0 * accuracy
    );
}
