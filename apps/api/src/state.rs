use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::extraction::SkillExtractor;
use crate::matching::MatchingEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Matching engine with the process-wide synonym table.
    pub engine: MatchingEngine,
    /// Document-parsing collaborator. Default: HttpSkillExtractor.
    pub extractor: Arc<dyn SkillExtractor>,
}
