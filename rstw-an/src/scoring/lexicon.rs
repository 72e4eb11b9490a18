//! Lexicon-based sentiment scoring
//!
//! Raw-sum variant: each token contributes its fixed weight, a handful of
//! whole-text containment boosts are added on top, and the result is clamped
//! to [-5, 5]. Label thresholds are tuned for the raw-sum scale (±1.0).

use rstw_common::models::SentimentLabel;

/// Lower clamp bound for the final sentiment score
pub const SCORE_MIN: f64 = -5.0;

/// Upper clamp bound for the final sentiment score
pub const SCORE_MAX: f64 = 5.0;

/// Per-token sentiment weights
const LEXICON: &[(&str, f64)] = &[
    ("calm", 2.0),
    ("balanced", 2.0),
    ("recharged", 2.0),
    ("energized", 2.0),
    ("supported", 1.0),
    ("grateful", 2.0),
    ("tired", -2.0),
    ("exhausted", -3.0),
    ("overwhelmed", -3.0),
    ("burned", -3.0),
    ("burnout", -4.0),
    ("stressed", -3.0),
    ("anxious", -3.0),
    ("panic", -4.0),
    ("insomnia", -3.0),
    ("drained", -3.0),
    ("hopeless", -4.0),
];

/// Terms whose presence anywhere in the text nudges the score upward
const POSITIVE_BOOST_TERMS: &[&str] = &[
    "excited",
    "progress",
    "good",
    "well",
    "happy",
    "accomplished",
    "successful",
];

/// Terms whose presence anywhere in the text nudges the score downward
const NEGATIVE_BOOST_TERMS: &[&str] = &[
    "overwhelmed",
    "tired",
    "stressed",
    "difficult",
    "hard",
    "struggling",
];

const POSITIVE_BOOST: f64 = 1.5;
const NEGATIVE_BOOST: f64 = 1.2;

/// Split text into lowercase word tokens, keeping intra-word apostrophes
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score a reflection: lexicon sum plus containment boosts, clamped and
/// rounded to two decimals.
pub fn score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let tokens = tokenize(text);

    let mut score: f64 = tokens
        .iter()
        .map(|token| {
            LEXICON
                .iter()
                .find(|(word, _)| word == token)
                .map(|(_, weight)| *weight)
                .unwrap_or(0.0)
        })
        .sum();

    for term in POSITIVE_BOOST_TERMS {
        if lower.contains(term) {
            score += POSITIVE_BOOST;
        }
    }
    for term in NEGATIVE_BOOST_TERMS {
        if lower.contains(term) {
            score -= NEGATIVE_BOOST;
        }
    }

    let clamped = score.clamp(SCORE_MIN, SCORE_MAX);
    (clamped * 100.0).round() / 100.0
}

/// Map a score to its sentiment label using the given threshold
pub fn label(score: f64, threshold: f64) -> SentimentLabel {
    if score > threshold {
        SentimentLabel::Positive
    } else if score < -threshold {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}
