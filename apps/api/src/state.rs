use std::sync::Arc;

use crate::analysis::engine::Analyzer;
use crate::analysis::store::ReportStore;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Analysis pipeline with its model collaborators injected at startup.
    pub analyzer: Analyzer,
    /// Postgres-backed when DATABASE_URL is set, in-memory otherwise.
    pub store: Arc<dyn ReportStore>,
    pub config: Config,
}
