//! Extraction client — forwards uploaded resume files to the document-parsing service.
//!
//! The service owns text extraction and the document safety checks; this module only
//! ships the file as a multipart `file` field and decodes the skills, candidate contact
//! fields and risk assessment it returns.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed extraction response: {0}")]
    Malformed(String),

    #[error("extraction service unavailable after {retries} attempts: {last}")]
    Unavailable { retries: u32, last: String },
}

/// Contact and background fields reported by the extraction service.
/// `experience` and `education` are passed through as returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub experience: Option<Value>,
    #[serde(default)]
    pub education: Option<Value>,
}

/// Document safety findings from the scanning service: privacy exposures (emails,
/// phone numbers, ID numbers in the text) and suspicious links. Entries are kept
/// as returned; only the overall score and level are interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(default)]
    pub risk_score: Option<u8>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub privacy_issues: Vec<Value>,
    #[serde(default)]
    pub vulnerabilities: Vec<Value>,
}

impl RiskAssessment {
    /// Level bands used by the scanning service: 70+ high, 30+ medium.
    pub fn level_for_score(score: u8) -> &'static str {
        match score {
            70.. => "high",
            30.. => "medium",
            _ => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedResume {
    pub skills: Vec<String>,
    pub candidate_info: CandidateInfo,
    pub risk: RiskAssessment,
}

/// Wire shape. Older service versions name the list `extracted_skills`; the
/// scanning fields arrive camelCased from the current service.
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    #[serde(default)]
    skills: Option<Vec<String>>,
    #[serde(default)]
    extracted_skills: Option<Vec<String>>,
    #[serde(default)]
    candidate_info: Option<CandidateInfo>,
    #[serde(default, alias = "riskScore")]
    risk_score: Option<u8>,
    #[serde(default, alias = "riskLevel")]
    risk_level: Option<String>,
    #[serde(default, alias = "privacyIssues")]
    privacy_issues: Vec<Value>,
    #[serde(default)]
    vulnerabilities: Vec<Value>,
}

impl From<ExtractionResponse> for ExtractedResume {
    fn from(raw: ExtractionResponse) -> Self {
        let risk_level = raw
            .risk_level
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .or_else(|| {
                raw.risk_score
                    .map(|score| RiskAssessment::level_for_score(score).to_string())
            });

        Self {
            skills: raw.skills.or(raw.extracted_skills).unwrap_or_default(),
            candidate_info: raw.candidate_info.unwrap_or_default(),
            risk: RiskAssessment {
                risk_score: raw.risk_score,
                risk_level,
                privacy_issues: raw.privacy_issues,
                vulnerabilities: raw.vulnerabilities,
            },
        }
    }
}

/// Decodes an extraction service response body.
pub fn parse_extraction_response(body: &str) -> Result<ExtractedResume, ExtractionError> {
    serde_json::from_str::<ExtractionResponse>(body)
        .map(ExtractedResume::from)
        .map_err(|e| ExtractionError::Malformed(e.to_string()))
}

/// A validated upload, held in memory for the duration of one scan.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Seam for the document-parsing collaborator. Carried in `AppState` as
/// `Arc<dyn SkillExtractor>` so tests can substitute a stub.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, file: &UploadedFile) -> Result<ExtractedResume, ExtractionError>;
}

/// HTTP implementation. Retries connect failures and 5xx responses with
/// exponential backoff; 4xx responses are returned immediately.
#[derive(Clone)]
pub struct HttpSkillExtractor {
    client: Client,
    endpoint: String,
}

impl HttpSkillExtractor {
    pub fn new(endpoint: String, timeout: Duration) -> Result<Self, ExtractionError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint,
        })
    }

    fn form(file: &UploadedFile) -> Result<Form, ExtractionError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        Ok(Form::new().part("file", part))
    }
}

#[async_trait]
impl SkillExtractor for HttpSkillExtractor {
    async fn extract(&self, file: &UploadedFile) -> Result<ExtractedResume, ExtractionError> {
        let mut last_error = String::new();

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s
                let delay = Duration::from_millis(500 * (1 << (attempt - 1)));
                warn!(
                    "Extraction attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            // Forms are consumed on send; rebuild per attempt.
            let response = self
                .client
                .post(&self.endpoint)
                .multipart(Self::form(file)?)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = e.to_string();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();
            let body = response.text().await?;

            if status.is_server_error() {
                warn!("Extraction service returned {}: {}", status, body);
                last_error = format!("{status}: {body}");
                continue;
            }

            if !status.is_success() {
                return Err(ExtractionError::Upstream {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let extracted = parse_extraction_response(&body)?;
            debug!(
                "Extraction succeeded for {}: {} skills",
                file.filename,
                extracted.skills.len()
            );
            return Ok(extracted);
        }

        Err(ExtractionError::Unavailable {
            retries: MAX_RETRIES,
            last: last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_skills_field() {
        let body = r#"{
            "skills": ["Python", "SQL"],
            "candidate_info": {
                "name": "Asha Rao",
                "email": "asha@example.com",
                "phone": "+91 98765 43210",
                "experience": "4 years",
                "education": ["B.Tech CSE"]
            }
        }"#;
        let parsed = parse_extraction_response(body).unwrap();
        assert_eq!(parsed.skills, vec!["Python", "SQL"]);
        assert_eq!(parsed.candidate_info.name.as_deref(), Some("Asha Rao"));
        assert_eq!(parsed.candidate_info.experience, Some(Value::from("4 years")));
        assert!(parsed.candidate_info.education.unwrap().is_array());
    }

    #[test]
    fn test_falls_back_to_extracted_skills() {
        let parsed = parse_extraction_response(r#"{"extracted_skills": ["Rust"]}"#).unwrap();
        assert_eq!(parsed.skills, vec!["Rust"]);
        assert_eq!(parsed.candidate_info, CandidateInfo::default());
    }

    #[test]
    fn test_skills_field_wins_over_extracted_skills() {
        let parsed =
            parse_extraction_response(r#"{"skills": ["Go"], "extracted_skills": ["Rust"]}"#)
                .unwrap();
        assert_eq!(parsed.skills, vec!["Go"]);
    }

    #[test]
    fn test_missing_skills_is_empty_not_error() {
        let parsed = parse_extraction_response(r#"{"candidate_info": {"name": "X"}}"#).unwrap();
        assert!(parsed.skills.is_empty());
    }

    #[test]
    fn test_parses_risk_assessment() {
        let body = r#"{
            "skills": ["Python"],
            "riskScore": 45,
            "riskLevel": "Medium",
            "privacyIssues": [
                {"type": "Phone", "count": 1, "risk_level": "medium"},
                {"type": "Email", "count": 2, "risk_level": "low"}
            ],
            "vulnerabilities": [
                {"type": "Suspicious URL", "severity": "medium"}
            ]
        }"#;
        let risk = parse_extraction_response(body).unwrap().risk;
        assert_eq!(risk.risk_score, Some(45));
        assert_eq!(risk.risk_level.as_deref(), Some("medium"));
        assert_eq!(risk.privacy_issues.len(), 2);
        assert_eq!(risk.privacy_issues[0]["type"], "Phone");
        assert_eq!(risk.vulnerabilities[0]["severity"], "medium");
    }

    #[test]
    fn test_risk_level_derived_from_score() {
        let risk = parse_extraction_response(r#"{"skills": [], "risk_score": 70}"#)
            .unwrap()
            .risk;
        assert_eq!(risk.risk_level.as_deref(), Some("high"));
        assert_eq!(RiskAssessment::level_for_score(30), "medium");
        assert_eq!(RiskAssessment::level_for_score(29), "low");
    }

    #[test]
    fn test_risk_fields_absent() {
        let parsed = parse_extraction_response(r#"{"skills": ["Go"]}"#).unwrap();
        assert_eq!(parsed.risk, RiskAssessment::default());
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        let err = parse_extraction_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn test_form_rejects_invalid_mime() {
        let file = UploadedFile {
            filename: "cv.pdf".to_string(),
            content_type: "not a mime".to_string(),
            bytes: Bytes::from_static(b"%PDF"),
        };
        assert!(HttpSkillExtractor::form(&file).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service_exhausts_retries() {
        // Nothing listens on the discard port locally.
        let extractor = HttpSkillExtractor::new(
            "http://127.0.0.1:9/extract".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        let file = UploadedFile {
            filename: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        };
        let err = extractor.extract(&file).await.unwrap_err();
        match err {
            ExtractionError::Unavailable { retries, last } => {
                assert_eq!(retries, MAX_RETRIES);
                assert!(!last.is_empty());
            }
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
