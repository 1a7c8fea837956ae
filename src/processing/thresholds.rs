//! Fixed scoring and extraction constants
//!
//! These values are part of the observable scoring contract. They are not
//! read from configuration.

/// Minimum similarity ratio for a fuzzy (misspelling) match
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.85;

/// Tokens and synonyms shorter than this (in characters) skip the fuzzy pass
pub const FUZZY_MIN_LENGTH: usize = 4;

/// Synonyms this short (in characters) never match as a dotted suffix,
/// so "node.js" does not also yield the "js" skill
pub const SHORT_SYNONYM_LENGTH: usize = 3;

/// Default cosine similarity for two skills to count as equivalent
pub const DEFAULT_EQUIVALENCE_THRESHOLD: f32 = 0.75;

/// Bonus points per candidate skill not consumed by a requirement
pub const EXTRA_SKILL_BONUS: f64 = 2.0;

/// Cap on the total extra-skill bonus
pub const EXTRA_BONUS_CAP: f64 = 15.0;

/// Penalty points per missing critical skill
pub const CRITICAL_SKILL_PENALTY: f64 = 10.0;

/// High-demand skills whose absence is penalised beyond the base score
pub const CRITICAL_SKILLS: &[&str] = &[
    "docker",
    "git",
    "java",
    "javascript",
    "kubernetes",
    "python",
    "sql",
];

/// Lower bound (inclusive) of the "excellent" recommendation tier
pub const EXCELLENT_SCORE: f64 = 90.0;

/// Lower bound (inclusive) of the "good" recommendation tier
pub const GOOD_SCORE: f64 = 70.0;

/// Lower bound (inclusive) of the "average" recommendation tier
pub const AVERAGE_SCORE: f64 = 50.0;

/// Skills listed in the "good" tier
pub const GOOD_TIER_LIMIT: usize = 3;

/// Skills listed in the "average" tier
pub const AVERAGE_TIER_LIMIT: usize = 5;

/// Skills listed in the "low" tier
pub const LOW_TIER_LIMIT: usize = 7;

/// Points added to the current score for the projected-improvement estimate
pub const PROJECTED_IMPROVEMENT: f64 = 20.0;

/// Ceiling for the projected-improvement estimate
pub const PROJECTED_SCORE_CAP: f64 = 95.0;

/// Default number of ranked candidates returned
pub const DEFAULT_RANKING_LIMIT: usize = 10;

pub fn is_critical(skill: &str) -> bool {
    CRITICAL_SKILLS.contains(&skill)
}

/// Round to one decimal place; applied only when building output values
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
