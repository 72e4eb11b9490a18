//! Burnout-signal keyword counting and cadence detection

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Burnout-signal keywords, matched case-insensitively on word boundaries
const BURNOUT_KEYWORDS: &[&str] = &[
    "exhausted",
    "can't",
    "tired",
    "overwhelmed",
    "sleep",
    "insomnia",
    "drained",
    "burnout",
    "hopeless",
    "stressed",
    "anxious",
    "panic",
];

/// Metadata frequency/cadence values that signal a daily-or-worse pattern
const HIGH_FREQUENCY_VALUES: &[&str] = &["daily", "everyday", "nightly", "constant", "24/7"];

static KEYWORD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    BURNOUT_KEYWORDS
        .iter()
        .map(|keyword| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(keyword)))
                .expect("keyword pattern must compile")
        })
        .collect()
});

static CADENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)every\s+day",
        r"(?i)each\s+day",
        r"(?i)daily",
        r"(?i)all\s+day",
        r"(?i)every\s+night",
        r"(?i)constantly",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("cadence pattern must compile"))
    .collect()
});

/// Count burnout-keyword occurrences in the text
pub fn count_keywords(text: &str) -> usize {
    KEYWORD_PATTERNS
        .iter()
        .map(|pattern| pattern.find_iter(text).count())
        .sum()
}

/// True when the metadata cadence hint or the text itself indicates a
/// daily-or-worse recurrence of the reported state.
pub fn high_frequency(text: &str, metadata: Option<&Value>) -> bool {
    let metadata_match = metadata
        .and_then(|meta| meta.get("frequency").or_else(|| meta.get("cadence")))
        .and_then(Value::as_str)
        .map(|value| HIGH_FREQUENCY_VALUES.contains(&value.to_lowercase().as_str()))
        .unwrap_or(false);

    metadata_match || CADENCE_PATTERNS.iter().any(|pattern| pattern.is_match(text))
}
