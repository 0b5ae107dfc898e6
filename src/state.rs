use crate::config::ServerConfig;
use crate::label::validation::RequestLimits;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn limits(&self) -> RequestLimits {
        RequestLimits {
            max_cases: self.config.max_cases,
            max_field_chars: self.config.max_field_chars,
        }
    }
}
