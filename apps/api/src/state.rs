use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::engine::ScoringEngine;
use crate::analysis::requirements::RequirementsExtractor;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The extractor and engine hold the one shared `LlmCapability`; analyses
/// share no other state, so cloning here is cheap and concurrency-safe.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub extractor: Arc<RequirementsExtractor>,
    pub engine: Arc<ScoringEngine>,
    pub config: Config,
}
