//! rstw-an library - Burnout Analysis module
//!
//! Request pipeline: consent-gated orchestration over a deterministic
//! scoring engine, a failover AI insight client, and a mutex-guarded
//! single-document store.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;

pub mod api;
pub mod consent;
pub mod insight;
pub mod scoring;
pub mod store;

use insight::InsightClient;
use scoring::ScoringEngine;
use store::DocumentStore;

/// Default outer budget for AI enrichment per analyze request: number of
/// configured providers times the largest per-provider timeout. The scoring
/// result is never held up longer than this.
pub const DEFAULT_INSIGHT_BUDGET: Duration = Duration::from_secs(60);

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub insight: Arc<InsightClient>,
    pub engine: Arc<ScoringEngine>,
    /// Outer timeout for the enrichment step of an analyze request
    pub insight_budget: Duration,
}

impl AppState {
    /// Create new application state with the default scoring engine and
    /// enrichment budget
    pub fn new(store: Arc<DocumentStore>, insight: Arc<InsightClient>) -> Self {
        Self {
            store,
            insight,
            engine: Arc::new(ScoringEngine::new()),
            insight_budget: DEFAULT_INSIGHT_BUDGET,
        }
    }

    /// Override the enrichment budget (tests use a short one)
    pub fn with_insight_budget(mut self, budget: Duration) -> Self {
        self.insight_budget = budget;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(api::analyze))
        .route("/api/profile", post(api::save_profile))
        .route(
            "/api/profile/:user_id",
            get(api::get_profile).delete(api::delete_profile),
        )
        .route("/api/profile/:user_id/export", get(api::export_profile))
        .route("/api/export/:user_id", get(api::export_profile))
        .route("/api/consent", post(api::record_consent))
        .merge(api::health_routes())
        .with_state(state)
}
