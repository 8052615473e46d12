use std::sync::Arc;

use crate::analysis::engine::AnalysisEngine;
use crate::config::Config;
use crate::store::AnalysisStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<AnalysisEngine>,
    pub store: Arc<AnalysisStore>,
}
