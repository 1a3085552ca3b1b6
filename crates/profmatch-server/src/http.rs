//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use profmatch_core::{
    EvaluationScope, Feature, MatchError, ProfessorProfile, Questionnaire, SimilarityResult,
    StoredPreferences, Subject,
};

use crate::AppState;

/// Error response wrapper mapping core errors onto status codes
#[derive(Debug)]
pub struct ApiError(pub MatchError);

impl From<MatchError> for ApiError {
    fn from(err: MatchError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            MatchError::NotFound(_) => StatusCode::NOT_FOUND,
            MatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            MatchError::Unconfigured(_) | MatchError::Persistence(_) | MatchError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.0.kind(), "{}", self.0);
        } else {
            tracing::debug!(kind = self.0.kind(), "{}", self.0);
        }

        let body = serde_json::json!({
            "error": self.0.kind(),
            "detail": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Optional subject filter
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub subject_id: Option<i64>,
}

impl From<ScopeQuery> for EvaluationScope {
    fn from(query: ScopeQuery) -> Self {
        EvaluationScope {
            subject_id: query.subject_id,
        }
    }
}

/// Save a student's questionnaire as their preference vector
pub async fn submit_profile(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
    Json(questionnaire): Json<Questionnaire>,
) -> Result<Json<StoredPreferences>, ApiError> {
    let saved = state
        .service
        .submit_preferences(student_id, &questionnaire)?;
    Ok(Json(saved))
}

/// Professors ranked for a student
pub async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<Vec<SimilarityResult>>, ApiError> {
    let ranked = state
        .service
        .recommendations(student_id, &scope.into())?;
    Ok(Json(ranked))
}

/// A professor's mean rating per feature
pub async fn get_professor_averages(
    State(state): State<Arc<AppState>>,
    Path(professor_id): Path<i64>,
    Query(scope): Query<ScopeQuery>,
) -> Result<Json<ProfessorProfile>, ApiError> {
    let profile = state
        .service
        .professor_averages(professor_id, &scope.into())?;
    Ok(Json(profile))
}

pub async fn list_subjects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Subject>>, ApiError> {
    Ok(Json(state.service.subjects()?))
}

/// Feature as listed by `/features`
#[derive(Debug, Serialize)]
pub struct FeatureSummary {
    pub index: usize,
    pub name: &'static str,
    pub label: &'static str,
}

/// The feature space in canonical order
pub async fn list_features() -> Json<Vec<FeatureSummary>> {
    let features = Feature::ALL
        .iter()
        .map(|f| FeatureSummary {
            index: f.index(),
            name: f.name(),
            label: f.label(),
        })
        .collect();
    Json(features)
}

/// Get system status
pub async fn get_status() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": profmatch_core::version(),
    }))
}
