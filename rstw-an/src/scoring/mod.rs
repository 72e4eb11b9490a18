//! Burnout scoring engine
//!
//! Pure classification of a reflection into a sentiment score, label,
//! burnout risk, and coping suggestions. No I/O; the only non-determinism is
//! the caller-supplied RNG used for suggestion picks.

pub mod keywords;
pub mod lexicon;
pub mod suggestions;

use rand::Rng;
use serde_json::Value;

use rstw_common::models::{BurnoutRisk, Profile, SentimentLabel};

/// Engine output, merged into the persisted analysis record by the caller
#[derive(Debug, Clone)]
pub struct Assessment {
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub burnout_risk: BurnoutRisk,
    pub keywords_count: usize,
    pub suggestions: Vec<String>,
}

/// Deterministic text-scoring engine
///
/// Raw-sum lexicon variant: token weights plus containment boosts, clamped
/// to [-5, 5], with a ±1.0 label threshold.
pub struct ScoringEngine {
    /// Label threshold: score above +t is positive, below -t negative
    label_threshold: f64,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self {
            label_threshold: 1.0,
        }
    }
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a reflection. `metadata` may carry a frequency/cadence hint;
    /// `profile` personalizes suggestion selection.
    pub fn assess<R: Rng + ?Sized>(
        &self,
        text: &str,
        metadata: Option<&Value>,
        profile: Option<&Profile>,
        rng: &mut R,
    ) -> Assessment {
        let sentiment_score = lexicon::score(text);
        let sentiment_label = lexicon::label(sentiment_score, self.label_threshold);
        let keywords_count = keywords::count_keywords(text);
        let high_frequency = keywords::high_frequency(text, metadata);

        let burnout_risk = classify_risk(
            sentiment_label == SentimentLabel::Negative,
            sentiment_score,
            keywords_count,
            high_frequency,
        );

        let suggestions = suggestions::build_suggestions(burnout_risk, profile, text, rng);

        Assessment {
            sentiment_score,
            sentiment_label,
            burnout_risk,
            keywords_count,
            suggestions,
        }
    }
}

/// Risk classification. The high-frequency flag counts as one extra keyword;
/// tie-break order matters: high is checked before medium.
fn classify_risk(
    negative: bool,
    score: f64,
    keywords_count: usize,
    high_frequency: bool,
) -> BurnoutRisk {
    let effective_keywords = keywords_count + usize::from(high_frequency);

    if negative && (effective_keywords >= 3 || score < -4.0) {
        return BurnoutRisk::High;
    }
    if negative && (effective_keywords >= 1 || score <= -2.0) {
        return BurnoutRisk::Medium;
    }
    BurnoutRisk::Low
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn assess(text: &str, metadata: Option<Value>) -> Assessment {
        let engine = ScoringEngine::new();
        let mut rng = StdRng::seed_from_u64(11);
        engine.assess(text, metadata.as_ref(), None, &mut rng)
    }

    #[test]
    fn test_exhausted_sleepless_reflection_is_high_risk() {
        let assessment = assess(
            "I feel exhausted, overwhelmed, and can't sleep every night",
            None,
        );
        assert_eq!(assessment.burnout_risk, BurnoutRisk::High);
        assert_eq!(assessment.sentiment_label, SentimentLabel::Negative);
        assert!(assessment.keywords_count >= 4);
    }

    #[test]
    fn test_metadata_cadence_raises_risk() {
        // Two keywords, moderately negative score: medium on its own
        let without = assess("I'm tired and can't focus", None);
        assert_eq!(without.burnout_risk, BurnoutRisk::Medium);

        // Daily cadence pushes the effective keyword count to three
        let with = assess(
            "I'm tired and can't focus",
            Some(json!({"frequency": "daily"})),
        );
        assert_eq!(with.burnout_risk, BurnoutRisk::High);
    }

    #[test]
    fn test_positive_reflection_is_low_risk() {
        let assessment = assess("Feeling calm, balanced and grateful today", None);
        assert_eq!(assessment.burnout_risk, BurnoutRisk::Low);
        assert_eq!(assessment.sentiment_label, SentimentLabel::Positive);
    }

    #[test]
    fn test_high_never_pairs_with_positive_label() {
        let samples = [
            "I feel exhausted, overwhelmed, and can't sleep every night",
            "calm grateful recharged",
            "tired but making progress",
            "panic and insomnia all day",
            "nothing special happened",
        ];
        let engine = ScoringEngine::new();
        let mut rng = StdRng::seed_from_u64(5);
        for text in samples {
            let assessment = engine.assess(text, None, None, &mut rng);
            assert!(
                !(assessment.burnout_risk == BurnoutRisk::High
                    && assessment.sentiment_label == SentimentLabel::Positive),
                "high risk with positive label for {:?}",
                text
            );
        }
    }

    #[test]
    fn test_score_always_within_bounds_and_suggestions_present() {
        let samples = [
            "a",
            "burnout burnout burnout burnout",
            "calm calm calm calm calm",
            "I can't keep doing this every day, hopeless and drained",
        ];
        let engine = ScoringEngine::new();
        let mut rng = StdRng::seed_from_u64(5);
        for text in samples {
            let assessment = engine.assess(text, None, None, &mut rng);
            assert!(assessment.sentiment_score >= lexicon::SCORE_MIN);
            assert!(assessment.sentiment_score <= lexicon::SCORE_MAX);
            assert!(!assessment.suggestions.is_empty());
        }
    }

    #[test]
    fn test_classify_risk_tie_breaks() {
        // Three effective keywords with a negative label: high
        assert_eq!(classify_risk(true, -1.5, 3, false), BurnoutRisk::High);
        // Two keywords plus the frequency flag: high
        assert_eq!(classify_risk(true, -1.5, 2, true), BurnoutRisk::High);
        // Very negative score alone: high
        assert_eq!(classify_risk(true, -4.5, 0, false), BurnoutRisk::High);
        // Single keyword: medium
        assert_eq!(classify_risk(true, -1.5, 1, false), BurnoutRisk::Medium);
        // No keywords but score at -2: medium
        assert_eq!(classify_risk(true, -2.0, 0, false), BurnoutRisk::Medium);
        // Positive label never classifies high or medium
        assert_eq!(classify_risk(false, -5.0, 10, true), BurnoutRisk::Low);
    }
}
