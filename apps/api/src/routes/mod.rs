pub mod health;
pub mod score;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::scans::handlers as scans;
use crate::state::AppState;

/// Room for multipart framing around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching engine
        .route("/api/v1/match", post(score::handle_score))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/jobs/:id/status",
            patch(jobs::handle_update_job_status),
        )
        .route(
            "/api/v1/jobs/:id/candidates",
            get(jobs::handle_rank_candidates),
        )
        // Scans
        .route(
            "/api/v1/scans",
            get(scans::handle_list_scans)
                .post(scans::handle_create_scan)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/scans/:id", get(scans::handle_get_scan))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::extraction::{
        CandidateInfo, ExtractedResume, ExtractionError, RiskAssessment, SkillExtractor,
        UploadedFile,
    };
    use crate::matching::synonyms::SynonymTable;
    use crate::matching::MatchingEngine;

    /// Counts calls so tests can assert the extractor was never reached.
    #[derive(Default)]
    struct StubExtractor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SkillExtractor for StubExtractor {
        async fn extract(&self, _file: &UploadedFile) -> Result<ExtractedResume, ExtractionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExtractedResume {
                skills: vec!["rust".to_string()],
                candidate_info: CandidateInfo::default(),
                risk: RiskAssessment::default(),
            })
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/vigyantra_test".to_string(),
            extraction_service_url: "http://localhost:8000/extract".to_string(),
            synonyms_path: None,
            extraction_timeout_secs: 5,
            max_upload_bytes: 1024,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn test_app(extractor: Arc<StubExtractor>) -> Router {
        let config = test_config();
        // Lazy pool: no connection is attempted unless a handler touches the database.
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState {
            db,
            config,
            engine: MatchingEngine::new(Arc::new(SynonymTable::builtin().unwrap())),
            extractor,
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(content_type: &str, payload: &[u8]) -> Request<Body> {
        let boundary = "X-VIGYANTRA-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"cv.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/scans")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app(Arc::default());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_endpoint_scores_pair() {
        let app = test_app(Arc::default());
        let request = Request::post("/api/v1/match")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "resume_skills": ["python", "react", "sql"],
                    "job_skills": ["python", "django"]
                })
                .to_string(),
            ))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["score"], 54);
        assert_eq!(body["matched_skills"], json!(["python"]));
        assert_eq!(body["missing_skills"], json!(["django"]));
    }

    #[tokio::test]
    async fn test_match_endpoint_missing_job_skills_scores_zero() {
        let app = test_app(Arc::default());
        let request = Request::post("/api/v1/match")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"resume_skills": ["rust"]}).to_string()))
            .unwrap();

        let body = body_json(app.oneshot(request).await.unwrap()).await;
        assert_eq!(body, json!({"matched_skills": [], "missing_skills": [], "score": 0}));
    }

    #[tokio::test]
    async fn test_scan_rejects_unsupported_file_type_before_extraction() {
        let extractor = Arc::new(StubExtractor::default());
        let app = test_app(extractor.clone());

        let response = app
            .oneshot(multipart_request("image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["error"]["code"], "UNSUPPORTED_FILE_TYPE");
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scan_rejects_oversized_file() {
        let extractor = Arc::new(StubExtractor::default());
        let app = test_app(extractor.clone());

        let response = app
            .oneshot(multipart_request("application/pdf", &[b'x'; 2048]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(extractor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_scan_requires_file_field() {
        let app = test_app(Arc::default());
        let boundary = "B";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{boundary}--\r\n"
        );
        let request = Request::post("/api/v1/scans")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }
}
