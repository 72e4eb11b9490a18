//! Burnout analysis endpoint
//!
//! The request orchestrator: validates the payload, gates on consent state,
//! runs the scoring engine synchronously, attempts best-effort AI enrichment
//! under an outer budget, then persists the analysis record and the profile
//! summary in one atomic store update.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use rstw_common::models::{
    AiInsight, AnalysisRecord, AnalysisSummary, BurnoutRisk, Profile, SentimentLabel,
};
use rstw_common::time;

use crate::api::error::ApiError;
use crate::consent::{self, ConsentGate};
use crate::insight::InsightContext;
use crate::scoring::Assessment;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub burnout_risk: BurnoutRisk,
    pub keywords_count: usize,
    pub suggestions: Vec<String>,
    pub ai_insights: Option<AiInsight>,
    pub enhanced: bool,
}

#[derive(Debug)]
struct ValidatedAnalyze {
    user_id: String,
    text: String,
    timestamp: DateTime<Utc>,
    metadata: Option<Value>,
}

/// Field-by-field validation; collects every failure before rejecting
fn validate(request: AnalyzeRequest) -> Result<ValidatedAnalyze, Vec<String>> {
    let mut errors = Vec::new();

    let user_id = request
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);
    if user_id.is_none() {
        errors.push("userId is required".to_string());
    }

    let text = request
        .text
        .as_ref()
        .filter(|t| t.trim().len() >= 5)
        .cloned();
    if text.is_none() {
        errors.push("text must be at least 5 characters".to_string());
    }

    let timestamp = request.timestamp.as_deref().and_then(time::parse_iso);
    if timestamp.is_none() {
        errors.push("timestamp must be an ISO-8601 string".to_string());
    }

    match (user_id, text, timestamp) {
        (Some(user_id), Some(text), Some(timestamp)) => Ok(ValidatedAnalyze {
            user_id,
            text,
            timestamp,
            metadata: request.metadata,
        }),
        _ => Err(errors),
    }
}

/// POST /api/analyze
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;
    let request = validate(request).map_err(ApiError::Validation)?;

    let snapshot = state.store.read().await.map_err(|e| {
        error!("Failed to read document store: {}", e);
        ApiError::Internal("Unable to process analysis request".to_string())
    })?;
    let profile = snapshot.profiles.get(&request.user_id).cloned();

    match consent::evaluate(profile.as_ref(), time::now()) {
        ConsentGate::Active => {}
        ConsentGate::RevokedHold => return Err(ApiError::ConsentRevoked),
        ConsentGate::NoProfile | ConsentGate::HoldExpired => {
            return Err(ApiError::ConsentRequired)
        }
    }

    let assessment = {
        let mut rng = rand::thread_rng();
        state.engine.assess(
            &request.text,
            request.metadata.as_ref(),
            profile.as_ref(),
            &mut rng,
        )
    };

    let ai_insights = enrich(&state, &request.text, &assessment).await;

    let record = AnalysisRecord {
        user_id: request.user_id.clone(),
        text: request.text.clone(),
        timestamp: request.timestamp,
        metadata: request.metadata.clone(),
        sentiment_score: assessment.sentiment_score,
        sentiment_label: assessment.sentiment_label,
        burnout_risk: assessment.burnout_risk,
        keywords_count: assessment.keywords_count,
        suggestions: assessment.suggestions.clone(),
        enhanced: ai_insights.is_some(),
        ai_insights,
    };

    let persisted = record.clone();
    let prior_profile = profile;
    state
        .store
        .update(move |mut doc| {
            let summary = AnalysisSummary {
                timestamp: persisted.timestamp,
                sentiment_score: persisted.sentiment_score,
                sentiment_label: persisted.sentiment_label,
                burnout_risk: persisted.burnout_risk,
                suggestions: persisted.suggestions.clone(),
            };

            let entry = doc
                .profiles
                .entry(persisted.user_id.clone())
                .or_insert_with(|| {
                    prior_profile.unwrap_or_else(|| Profile::placeholder(&persisted.user_id))
                });
            entry.last_analysis = Some(summary);

            doc.analyses.push(persisted);
            doc
        })
        .await
        .map_err(|e| {
            error!("Failed to persist analysis: {}", e);
            ApiError::Internal("Unable to process analysis request".to_string())
        })?;

    Ok(Json(AnalyzeResponse {
        user_id: record.user_id,
        timestamp: record.timestamp,
        sentiment_score: record.sentiment_score,
        sentiment_label: record.sentiment_label,
        burnout_risk: record.burnout_risk,
        keywords_count: record.keywords_count,
        suggestions: record.suggestions,
        ai_insights: record.ai_insights,
        enhanced: record.enhanced,
    }))
}

/// Best-effort AI enrichment. Runs under the orchestrator-level budget so a
/// slow rotation can never hold up the scoring-only result; any failure or
/// timeout just omits the insight.
async fn enrich(state: &AppState, text: &str, assessment: &Assessment) -> Option<AiInsight> {
    let prompt = format!(
        "Analyze this mental health reflection and provide 2-3 actionable insights:\n\n\
         Text: \"{}\"\n\
         Sentiment Score: {}\n\
         Burnout Risk: {}\n\
         Keywords Found: {}\n\n\
         Provide specific, empathetic recommendations for this user's mental wellness.",
        text,
        assessment.sentiment_score,
        assessment.burnout_risk.as_str(),
        assessment.keywords_count
    );
    let context = InsightContext {
        mood: assessment.sentiment_label,
        stress_level: assessment.burnout_risk,
        keyword_count: assessment.keywords_count,
    };

    let call = state.insight.generate_insight(&prompt, &context);
    match tokio::time::timeout(state.insight_budget, call).await {
        Ok(insight) if insight.success => Some(AiInsight {
            content: insight.content,
            provider: insight.provider,
            confidence: "high".to_string(),
        }),
        Ok(_) => None,
        Err(_) => {
            warn!("Insight generation exceeded the request budget; continuing without enrichment");
            None
        }
    }
}
