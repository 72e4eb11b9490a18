//! Coping-suggestion selection
//!
//! Suggestions come from four fixed pools. Text content hints take priority,
//! then risk level, with profile support preferences steering the medium-risk
//! pick. Random choices go through the caller-supplied RNG so tests can seed
//! them.

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use rstw_common::models::{BurnoutRisk, Profile};

pub const BREATHING: &[&str] = &[
    "4-7-8 breathing technique for stress relief",
    "Box breathing: inhale 4s, hold 4s, exhale 4s for 5 rounds",
    "Alternate nostril breathing for 5 minutes",
    "Deep belly breathing with 6-second cycles",
];

pub const DETOX: &[&str] = &[
    "2-hour phone-free evening routine before bed",
    "Schedule a 30-minute notification blackout after lunch",
    "Create a tech-free workspace for 1 hour",
    "Morning meditation without devices for 10 minutes",
];

pub const ENERGY: &[&str] = &[
    "Take a 10-minute energizing walk outside",
    "Do 5 minutes of light stretching or yoga",
    "Listen to upbeat music for a quick mood boost",
    "Practice gratitude by writing 3 positive things",
];

pub const SLEEP: &[&str] = &[
    "Establish a consistent bedtime routine",
    "Avoid screens 1 hour before sleep",
    "Try progressive muscle relaxation",
    "Keep your bedroom cool and dark",
];

/// Last-resort suggestion; the returned list is never empty
pub const FALLBACK_SUGGESTION: &str = "Take a moment to appreciate your progress today.";

/// Suggestion category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportCategory {
    Breathing,
    Detox,
    Energy,
    Sleep,
}

impl SupportCategory {
    pub const ALL: [SupportCategory; 4] = [
        SupportCategory::Breathing,
        SupportCategory::Detox,
        SupportCategory::Energy,
        SupportCategory::Sleep,
    ];

    pub fn pool(self) -> &'static [&'static str] {
        match self {
            SupportCategory::Breathing => BREATHING,
            SupportCategory::Detox => DETOX,
            SupportCategory::Energy => ENERGY,
            SupportCategory::Sleep => SLEEP,
        }
    }
}

fn preference_flag(profile: &Profile, key: &str) -> bool {
    profile
        .preferences
        .get(key)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn preferred_support(profile: &Profile) -> Option<&str> {
    profile
        .preferences
        .get("preferredSupport")
        .and_then(Value::as_str)
}

/// Resolve the category a medium/low-risk pick should come from.
///
/// An unambiguous profile preference (breathing vs digital detox) wins;
/// otherwise medium and high risk fall back to breathing, low risk to detox.
fn preferred_category(risk: BurnoutRisk, profile: Option<&Profile>) -> SupportCategory {
    if let Some(profile) = profile {
        let prefers_breathing = preferred_support(profile) == Some("breathing")
            || preference_flag(profile, "prefersBreathing");
        let prefers_detox = preferred_support(profile) == Some("detox")
            || preference_flag(profile, "prefersDigitalDetox");

        if prefers_breathing && !prefers_detox {
            return SupportCategory::Breathing;
        }
        if prefers_detox && !prefers_breathing {
            return SupportCategory::Detox;
        }
    }

    match risk {
        BurnoutRisk::High | BurnoutRisk::Medium => SupportCategory::Breathing,
        BurnoutRisk::Low => SupportCategory::Detox,
    }
}

/// Build the suggestion list for an assessment. Never returns an empty list.
pub fn build_suggestions<R: Rng + ?Sized>(
    risk: BurnoutRisk,
    profile: Option<&Profile>,
    text: &str,
    rng: &mut R,
) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();

    if lower.contains("sleep") || lower.contains("tired") || lower.contains("exhausted") {
        suggestions.extend(SLEEP.iter().take(2).map(|s| s.to_string()));
    } else if lower.contains("energy") || lower.contains("motivated") {
        suggestions.extend(ENERGY.iter().take(2).map(|s| s.to_string()));
    } else if risk == BurnoutRisk::High {
        suggestions.push(BREATHING[0].to_string());
        suggestions.push(DETOX[0].to_string());
    } else if risk == BurnoutRisk::Medium {
        let category = preferred_category(risk, profile);
        let pick = category
            .pool()
            .choose(rng)
            .expect("suggestion pools are non-empty");
        suggestions.push(pick.to_string());

        // Second suggestion comes from a different category
        let others: Vec<SupportCategory> = SupportCategory::ALL
            .iter()
            .copied()
            .filter(|c| *c != category)
            .collect();
        let other = others.choose(rng).expect("three alternatives remain");
        suggestions.push(other.pool()[0].to_string());
    } else {
        let category = if rng.gen_bool(0.5) {
            SupportCategory::Energy
        } else {
            SupportCategory::Detox
        };
        let pick = category
            .pool()
            .choose(rng)
            .expect("suggestion pools are non-empty");
        suggestions.push(pick.to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(FALLBACK_SUGGESTION.to_string());
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn profile_with_preferences(preferences: Value) -> Profile {
        let mut profile = Profile::placeholder("user-1");
        profile.preferences = preferences.as_object().cloned().unwrap_or_default();
        profile
    }

    #[test]
    fn test_never_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        for risk in [BurnoutRisk::Low, BurnoutRisk::Medium, BurnoutRisk::High] {
            let suggestions = build_suggestions(risk, None, "nothing to report", &mut rng);
            assert!(!suggestions.is_empty());
        }
    }

    #[test]
    fn test_sleep_hints_override_risk() {
        let mut rng = StdRng::seed_from_u64(7);
        let suggestions = build_suggestions(BurnoutRisk::High, None, "I cannot sleep", &mut rng);
        assert_eq!(suggestions, vec![SLEEP[0].to_string(), SLEEP[1].to_string()]);
    }

    #[test]
    fn test_energy_hints_select_energy_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        let suggestions = build_suggestions(BurnoutRisk::Low, None, "low on energy today", &mut rng);
        assert_eq!(
            suggestions,
            vec![ENERGY[0].to_string(), ENERGY[1].to_string()]
        );
    }

    #[test]
    fn test_high_risk_pairs_breathing_and_detox() {
        let mut rng = StdRng::seed_from_u64(7);
        let suggestions = build_suggestions(BurnoutRisk::High, None, "deadline pressure", &mut rng);
        assert_eq!(
            suggestions,
            vec![BREATHING[0].to_string(), DETOX[0].to_string()]
        );
    }

    #[test]
    fn test_medium_risk_yields_two_distinct_categories() {
        let mut rng = StdRng::seed_from_u64(42);
        let suggestions =
            build_suggestions(BurnoutRisk::Medium, None, "deadline pressure", &mut rng);
        assert_eq!(suggestions.len(), 2);
        // First pick defaults to the breathing pool without a profile preference
        assert!(BREATHING.contains(&suggestions[0].as_str()));
        assert!(!BREATHING.contains(&suggestions[1].as_str()));
    }

    #[test]
    fn test_profile_preference_steers_medium_pick() {
        let mut rng = StdRng::seed_from_u64(42);
        let profile = profile_with_preferences(json!({"preferredSupport": "detox"}));
        let suggestions = build_suggestions(
            BurnoutRisk::Medium,
            Some(&profile),
            "deadline pressure",
            &mut rng,
        );
        assert!(DETOX.contains(&suggestions[0].as_str()));
    }

    #[test]
    fn test_ambiguous_preference_falls_back_to_risk_default() {
        let profile = profile_with_preferences(json!({
            "prefersBreathing": true,
            "prefersDigitalDetox": true
        }));
        assert_eq!(
            preferred_category(BurnoutRisk::Medium, Some(&profile)),
            SupportCategory::Breathing
        );
        assert_eq!(
            preferred_category(BurnoutRisk::Low, Some(&profile)),
            SupportCategory::Detox
        );
    }

    #[test]
    fn test_low_risk_pick_comes_from_positive_pools() {
        let mut rng = StdRng::seed_from_u64(3);
        let suggestions = build_suggestions(BurnoutRisk::Low, None, "quiet afternoon", &mut rng);
        assert_eq!(suggestions.len(), 1);
        let pick = suggestions[0].as_str();
        assert!(ENERGY.contains(&pick) || DETOX.contains(&pick));
    }
}
