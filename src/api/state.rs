// Shared state for request handlers

use std::sync::Arc;

use crate::services::Detector;

#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<Detector>,
    pub max_concurrency: usize,
}

pub type SharedState = Arc<AppState>;
