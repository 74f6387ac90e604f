use std::sync::Arc;

use crate::config::Config;
use crate::ranking::evaluator::CvEvaluator;
use crate::sessions::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable evaluator. Production: LlmEvaluator; tests swap in mocks.
    pub evaluator: Arc<dyn CvEvaluator>,
    /// In-memory session store. Nothing outlives the process.
    pub sessions: SessionStore,
}
