//! Axum route handlers for the Scan API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use sqlx::types::Json as SqlJson;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{ExtractedResume, UploadedFile};
use crate::matching::ranking::Ranking;
use crate::matching::MatchingEngine;
use crate::models::job::{JobRow, JobStatus};
use crate::models::scan::ScanRow;
use crate::scans::query::{build_count_query, build_list_query, Pagination, ScanListQuery};
use crate::scans::upload::read_upload;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ScanListResponse {
    pub scans: Vec<ScanRow>,
    pub total: i64,
    #[serde(flatten)]
    pub pagination: Pagination,
}

// ────────────────────────────────────────────────────────────────────────────
// Scan evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Everything needed to persist a scan. Built only once ranking has finished,
/// so a scan row is never written with a partial result.
#[derive(Debug, Clone)]
pub struct NewScan {
    pub id: Uuid,
    pub file: UploadedFile,
    pub extracted: ExtractedResume,
    pub ranking: Ranking<Uuid>,
}

impl NewScan {
    pub fn top_job_id(&self) -> Option<Uuid> {
        self.ranking.top_match.id().copied()
    }

    pub fn top_score(&self) -> i16 {
        i16::from(self.ranking.top_match.score())
    }
}

/// Ranks the extracted skills against the given jobs off the async executor.
pub async fn evaluate_scan(
    engine: MatchingEngine,
    file: UploadedFile,
    extracted: ExtractedResume,
    jobs: Vec<JobRow>,
) -> Result<NewScan, AppError> {
    let skills = extracted.skills.clone();
    let ranking = tokio::task::spawn_blocking(move || engine.rank_jobs(&skills, &jobs))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(NewScan {
        id: Uuid::new_v4(),
        file,
        extracted,
        ranking,
    })
}

async fn fetch_open_jobs(pool: &PgPool) -> Result<Vec<JobRow>, AppError> {
    let jobs = sqlx::query_as::<_, JobRow>(
        "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at, id",
    )
    .bind(JobStatus::Open.as_str())
    .fetch_all(pool)
    .await?;
    Ok(jobs)
}

async fn insert_scan(pool: &PgPool, scan: &NewScan) -> Result<ScanRow, AppError> {
    let row = sqlx::query_as::<_, ScanRow>(
        r#"
        INSERT INTO scans
            (id, filename, file_size, content_type, candidate_info, skills,
             matches, top_match, top_job_id, top_score, risk)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(scan.id)
    .bind(&scan.file.filename)
    .bind(scan.file.bytes.len() as i64)
    .bind(&scan.file.content_type)
    .bind(SqlJson(&scan.extracted.candidate_info))
    .bind(&scan.extracted.skills)
    .bind(SqlJson(&scan.ranking.matches))
    .bind(SqlJson(&scan.ranking.top_match))
    .bind(scan.top_job_id())
    .bind(scan.top_score())
    .bind(SqlJson(&scan.extracted.risk))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/scans
///
/// Accepts a multipart `file` (PDF or Word), extracts skills through the
/// extraction service, ranks every open job and stores the scan.
pub async fn handle_create_scan(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ScanRow>), AppError> {
    let file = read_upload(multipart, state.config.max_upload_bytes).await?;
    let extracted = state.extractor.extract(&file).await?;

    let jobs = fetch_open_jobs(&state.db).await?;
    let scan = evaluate_scan(state.engine.clone(), file, extracted, jobs).await?;
    let row = insert_scan(&state.db, &scan).await?;

    info!(
        scan_id = %row.id,
        jobs_evaluated = scan.ranking.evaluated,
        top_score = row.top_score,
        risk_level = row.risk.risk_level.as_deref().unwrap_or("unknown"),
        "Scan completed"
    );

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/scans
///
/// Lists past scans, newest first. Supports `search`, `min_score`, `page`, `per_page`.
pub async fn handle_list_scans(
    State(state): State<AppState>,
    Query(query): Query<ScanListQuery>,
) -> Result<Json<ScanListResponse>, AppError> {
    let pagination = Pagination::from_query(&query);

    let total: i64 = build_count_query(&query)
        .build_query_scalar::<i64>()
        .fetch_one(&state.db)
        .await?;

    let scans = build_list_query(&query, pagination)
        .build_query_as::<ScanRow>()
        .fetch_all(&state.db)
        .await?;

    Ok(Json(ScanListResponse {
        scans,
        total,
        pagination,
    }))
}

/// GET /api/v1/scans/:id
pub async fn handle_get_scan(
    State(state): State<AppState>,
    Path(scan_id): Path<Uuid>,
) -> Result<Json<ScanRow>, AppError> {
    let scan = sqlx::query_as::<_, ScanRow>("SELECT * FROM scans WHERE id = $1")
        .bind(scan_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Scan {scan_id} not found")))?;

    Ok(Json(scan))
}
