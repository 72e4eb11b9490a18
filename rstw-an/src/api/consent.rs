//! Consent endpoint
//!
//! Appends to the consent log and projects the new state onto the profile:
//! granting consent clears any retention hold, revoking it opens a 7-day
//! retention window during which analysis is blocked.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::error;

use rstw_common::models::{ConsentRecord, ConsentStatus, Profile};
use rstw_common::time;

use crate::api::error::ApiError;
use crate::consent::retention_until;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub consent_given: Option<bool>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug)]
struct ValidatedConsent {
    user_id: String,
    consent_given: bool,
    timestamp: DateTime<Utc>,
}

fn validate(request: ConsentRequest) -> Result<ValidatedConsent, Vec<String>> {
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

    if request.consent_given.is_none() {
        errors.push("consentGiven must be a boolean".to_string());
    }

    let timestamp = request.timestamp.as_deref().and_then(time::parse_iso);
    if timestamp.is_none() {
        errors.push("timestamp must be an ISO-8601 string".to_string());
    }

    match (user_id, request.consent_given, timestamp) {
        (Some(user_id), Some(consent_given), Some(timestamp)) => Ok(ValidatedConsent {
            user_id,
            consent_given,
            timestamp,
        }),
        _ => Err(errors),
    }
}

/// POST /api/consent
pub async fn record_consent(
    State(state): State<AppState>,
    payload: Result<Json<ConsentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConsentRecord>), ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;
    let validated = validate(request).map_err(ApiError::Validation)?;

    let record = ConsentRecord {
        user_id: validated.user_id,
        consent_given: validated.consent_given,
        timestamp: validated.timestamp,
    };

    let persisted = record.clone();
    state
        .store
        .update(move |mut doc| {
            let retention = if persisted.consent_given {
                None
            } else {
                Some(retention_until(time::now()))
            };

            let entry = doc
                .profiles
                .entry(persisted.user_id.clone())
                .or_insert_with(|| Profile::placeholder(&persisted.user_id));
            entry.consent = Some(ConsentStatus {
                consent_given: persisted.consent_given,
                timestamp: persisted.timestamp,
            });
            entry.retention_until = retention;

            doc.consents.push(persisted);
            doc
        })
        .await
        .map_err(|e| {
            error!("Failed to record consent: {}", e);
            ApiError::Internal("Unable to save consent".to_string())
        })?;

    Ok((StatusCode::CREATED, Json(record)))
}
