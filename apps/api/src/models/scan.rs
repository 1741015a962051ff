use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::extraction::{CandidateInfo, RiskAssessment};
use crate::matching::ranking::{RankedMatch, SkillProfile, TopMatch};

/// A persisted resume scan: what was extracted and how it ranked against open jobs.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScanRow {
    pub id: Uuid,
    pub filename: String,
    pub file_size: i64,
    pub content_type: String,
    pub candidate_info: Json<CandidateInfo>,
    pub skills: Vec<String>,
    pub matches: Json<Vec<RankedMatch<Uuid>>>,
    pub top_match: Json<TopMatch<Uuid>>,
    pub top_job_id: Option<Uuid>,
    pub top_score: i16,
    pub risk: Json<RiskAssessment>,
    pub created_at: DateTime<Utc>,
}

/// The columns candidate ranking reads from a scan.
#[derive(Debug, Clone, FromRow)]
pub struct ScanSkills {
    pub id: Uuid,
    pub skills: Vec<String>,
}

impl ScanSkills {
    pub const SELECT_ALL: &'static str = "SELECT id, skills FROM scans ORDER BY created_at, id";
}

impl SkillProfile for ScanSkills {
    type Id = Uuid;

    fn id(&self) -> Uuid {
        self.id
    }

    fn skills(&self) -> &[String] {
        &self.skills
    }
}
