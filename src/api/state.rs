use std::sync::Arc;

use crate::services::{LocalCatalog, RecommendationEngine};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RecommendationEngine>,
}

impl AppState {
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    pub fn catalog(&self) -> &LocalCatalog {
        self.engine.catalog()
    }
}
