use axum::{extract::State, Json};
use serde::Deserialize;

use crate::matching::scoring::MatchResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume_skills: Option<Vec<String>>,
    pub job_skills: Option<Vec<String>>,
}

/// POST /api/v1/match
/// Scores one resume skill list against one job skill list. Missing lists score 0.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Json<MatchResult> {
    Json(state.engine.score(
        request.resume_skills.as_deref(),
        request.job_skills.as_deref(),
    ))
}
