//! Profile endpoints: save, fetch, export, delete

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use rstw_common::models::{AnalysisRecord, ConsentRecord, Profile};

use crate::api::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub preferences: Option<Value>,
}

/// Per-user data bundle returned by the export endpoints
#[derive(Debug, Serialize)]
pub struct ExportBundle {
    pub profile: Profile,
    pub analyses: Vec<AnalysisRecord>,
    pub consents: Vec<ConsentRecord>,
}

#[derive(Debug)]
struct ValidatedProfile {
    user_id: String,
    name: String,
    timezone: String,
    preferences: serde_json::Map<String, Value>,
}

fn validate(request: ProfileRequest) -> Result<ValidatedProfile, Vec<String>> {
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

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|v| v.len() > 1)
        .map(str::to_string);
    if name.is_none() {
        errors.push("name is required".to_string());
    }

    let timezone = request
        .timezone
        .as_deref()
        .map(str::trim)
        .filter(|v| v.len() > 2)
        .map(str::to_string);
    if timezone.is_none() {
        errors.push("timezone is required".to_string());
    }

    let preferences = match request.preferences {
        None => Some(serde_json::Map::new()),
        Some(Value::Object(map)) => Some(map),
        Some(_) => {
            errors.push("preferences must be an object if provided".to_string());
            None
        }
    };

    match (user_id, name, timezone, preferences) {
        (Some(user_id), Some(name), Some(timezone), Some(preferences)) => Ok(ValidatedProfile {
            user_id,
            name,
            timezone,
            preferences,
        }),
        _ => Err(errors),
    }
}

/// POST /api/profile
///
/// Upsert. Consent, retention, and lastAnalysis survive a re-save that
/// omits them.
pub async fn save_profile(
    State(state): State<AppState>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<Json<Profile>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))?;
    let validated = validate(request).map_err(ApiError::Validation)?;

    let user_id = validated.user_id.clone();
    let doc = state
        .store
        .update(move |mut doc| {
            let prior = doc.profiles.get(&validated.user_id).cloned();
            let profile = Profile {
                user_id: validated.user_id.clone(),
                name: validated.name,
                timezone: validated.timezone,
                preferences: validated.preferences,
                consent: prior.as_ref().and_then(|p| p.consent.clone()),
                retention_until: prior.as_ref().and_then(|p| p.retention_until),
                last_analysis: prior.and_then(|p| p.last_analysis),
            };
            doc.profiles.insert(validated.user_id, profile);
            doc
        })
        .await
        .map_err(|e| {
            error!("Failed to upsert profile: {}", e);
            ApiError::Internal("Unable to save profile".to_string())
        })?;

    let profile = doc
        .profiles
        .get(&user_id)
        .cloned()
        .ok_or_else(|| ApiError::Internal("Unable to save profile".to_string()))?;
    Ok(Json(profile))
}

/// GET /api/profile/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let doc = state.store.read().await.map_err(|e| {
        error!("Failed to read profile: {}", e);
        ApiError::Internal("Unable to read profile".to_string())
    })?;

    match doc.profiles.get(&user_id) {
        Some(profile) => Ok(Json(profile.clone())),
        None => Err(ApiError::NotFound("Profile not found".to_string())),
    }
}

/// GET /api/export/:user_id (alias GET /api/profile/:user_id/export)
///
/// Everything stored for one userId: profile plus the consent and analysis
/// log entries referencing it.
pub async fn export_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ExportBundle>, ApiError> {
    let doc = state.store.read().await.map_err(|e| {
        error!("Failed to export profile: {}", e);
        ApiError::Internal("Unable to export profile".to_string())
    })?;

    let Some(profile) = doc.profiles.get(&user_id).cloned() else {
        return Err(ApiError::NotFound("Profile not found".to_string()));
    };

    let analyses = doc
        .analyses
        .iter()
        .filter(|record| record.user_id == user_id)
        .cloned()
        .collect();
    let consents = doc
        .consents
        .iter()
        .filter(|record| record.user_id == user_id)
        .cloned()
        .collect();

    Ok(Json(ExportBundle {
        profile,
        analyses,
        consents,
    }))
}

/// DELETE /api/profile/:user_id
///
/// Hard removal with cascade: the profile and every consent/analysis entry
/// referencing it go in one atomic update.
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut removed = false;
    let target = user_id.clone();
    state
        .store
        .update(|mut doc| {
            removed = doc.profiles.remove(&target).is_some();
            doc.analyses.retain(|record| record.user_id != target);
            doc.consents.retain(|record| record.user_id != target);
            doc
        })
        .await
        .map_err(|e| {
            error!("Failed to delete profile: {}", e);
            ApiError::Internal("Unable to delete profile".to_string())
        })?;

    if !removed {
        return Err(ApiError::NotFound("Profile not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
