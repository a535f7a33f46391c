use std::sync::Arc;

use sqlx::PgPool;

use crate::analysis::analyzer::ResumeAnalyzer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Pluggable analyzer. Default: `GeminiAnalyzer`; tests swap in a stub.
    pub analyzer: Arc<dyn ResumeAnalyzer>,
}
