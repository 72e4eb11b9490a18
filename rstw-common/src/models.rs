//! Persisted document models
//!
//! The whole database is one JSON document: a profile map plus append-only
//! consent and analysis logs. Field names follow the camelCase wire format
//! used by the HTTP API, so these types serve double duty as storage and
//! response shapes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root object of the document store.
///
/// Invariant: every key in `profiles` equals the embedded `user_id` of its
/// value. Consent and analysis entries reference userIds that have (or had)
/// a profile; profile deletion cascades over both logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    #[serde(default)]
    pub consents: Vec<ConsentRecord>,
    #[serde(default)]
    pub analyses: Vec<AnalysisRecord>,
}

/// Per-user profile, keyed by `user_id` in [`Document::profiles`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub name: String,
    pub timezone: String,
    /// Free-form settings (session length, detox format, support preference, ...)
    #[serde(default)]
    pub preferences: serde_json::Map<String, Value>,
    /// Projection of the latest consent record, if any
    #[serde(default)]
    pub consent: Option<ConsentStatus>,
    /// Set while a consent revocation's data-retention window is in force
    #[serde(default)]
    pub retention_until: Option<DateTime<Utc>>,
    /// Summary of the most recent analysis
    #[serde(default)]
    pub last_analysis: Option<AnalysisSummary>,
}

impl Profile {
    /// Minimal scaffold used when a consent or analysis record arrives for a
    /// userId that has never saved a profile.
    pub fn placeholder(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: "Guest".to_string(),
            timezone: "UTC".to_string(),
            preferences: serde_json::Map::new(),
            consent: None,
            retention_until: None,
            last_analysis: None,
        }
    }
}

/// Current consent state embedded in a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentStatus {
    pub consent_given: bool,
    pub timestamp: DateTime<Utc>,
}

/// Append-only consent log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    pub user_id: String,
    pub consent_given: bool,
    pub timestamp: DateTime<Utc>,
}

/// Append-only analysis log entry; immutable once written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub user_id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Option<Value>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub burnout_risk: BurnoutRisk,
    pub keywords_count: usize,
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub ai_insights: Option<AiInsight>,
    /// True when an AI insight was obtained for this record
    pub enhanced: bool,
}

/// Compact view of an analysis kept on the profile as `lastAnalysis`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub timestamp: DateTime<Utc>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub burnout_risk: BurnoutRisk,
    pub suggestions: Vec<String>,
}

/// AI-generated enrichment attached to an analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsight {
    pub content: String,
    pub provider: String,
    pub confidence: String,
}

/// Sentiment classification of a reflection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

/// Burnout risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnoutRisk {
    Low,
    Medium,
    High,
}

impl BurnoutRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            BurnoutRisk::Low => "low",
            BurnoutRisk::Medium => "medium",
            BurnoutRisk::High => "high",
        }
    }
}
