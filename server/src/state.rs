//! Shared state handed to every handler.

use atpl_extractor::ExtractionService;

#[derive(Clone)]
pub struct AppState {
    pub service: ExtractionService,
}

impl AppState {
    pub fn new(service: ExtractionService) -> Self {
        Self { service }
    }
}
