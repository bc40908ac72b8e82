//! Application state shared by all handlers

use imgpress_core::Config;
use imgpress_services::CompressionService;

#[derive(Clone)]
pub struct AppState {
    pub service: CompressionService,
    pub config: Config,
}

impl AppState {
    pub fn new(service: CompressionService, config: Config) -> Self {
        Self { service, config }
    }
}
