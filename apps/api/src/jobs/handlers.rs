//! Axum route handlers for the Job API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::ranking::Ranking;
use crate::models::job::{JobRow, JobStatus};
use crate::models::scan::ScanSkills;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub status: JobStatus,
}

impl CreateJobRequest {
    /// Trims the title and drops blank skills. Skills are stored as given
    /// otherwise; normalization happens at match time.
    fn validated(mut self) -> Result<Self, AppError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        self.skills.retain(|s| !s.trim().is_empty());
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobStatusRequest {
    pub status: JobStatus,
}

#[derive(Debug, Serialize)]
pub struct CandidateRankingResponse {
    pub job: JobRow,
    pub ranking: Ranking<Uuid>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let request = request.validated()?;

    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (id, title, company, description, skills, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.title)
    .bind(&request.company)
    .bind(&request.description)
    .bind(&request.skills)
    .bind(request.status.as_str())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/jobs?status=open|closed
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let jobs = match query.status {
        Some(status) => {
            sqlx::query_as::<_, JobRow>(
                "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at, id",
            )
            .bind(status.as_str())
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at, id")
                .fetch_all(&state.db)
                .await?
        }
    };

    Ok(Json(jobs))
}

/// PATCH /api/v1/jobs/:id/status
///
/// Closing a job removes it from matching for future scans; past scans keep their results.
pub async fn handle_update_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(request): Json<UpdateJobStatusRequest>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE jobs SET status = $1 WHERE id = $2")
        .bind(request.status.as_str())
        .bind(job_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/jobs/:id/candidates
///
/// Ranks every stored scan against this job's skills.
pub async fn handle_rank_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<CandidateRankingResponse>, AppError> {
    let job = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let scans = sqlx::query_as::<_, ScanSkills>(ScanSkills::SELECT_ALL)
        .fetch_all(&state.db)
        .await?;

    let engine = state.engine.clone();
    let job_skills = job.skills.clone();
    let ranking = tokio::task::spawn_blocking(move || engine.rank_candidates(&job_skills, &scans))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(CandidateRankingResponse { job, ranking }))
}
