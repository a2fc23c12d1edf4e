use std::sync::Arc;

use crate::config::ServerConfig;
use crate::pages::Pages;
use crate::rate_limit::GenerateRateLimiter;
use crate::storage::GameStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GameStore>,
    pub pages: Arc<Pages>,
    pub generate_limiter: Arc<GenerateRateLimiter>,
    pub config: Arc<ServerConfig>,
}

/// Failure assembling the application state.
#[derive(Debug)]
pub enum StartupError {
    Storage(std::io::Error),
    Templates(tera::Error),
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "failed to prepare game directories: {e}"),
            Self::Templates(e) => write!(f, "failed to load page templates: {e}"),
        }
    }
}

impl std::error::Error for StartupError {}

impl AppState {
    /// Open the game store (creating its directories) and load page templates.
    pub fn new(config: ServerConfig) -> Result<Self, StartupError> {
        let store = GameStore::open(&config.static_root).map_err(StartupError::Storage)?;
        let pages = Pages::new().map_err(StartupError::Templates)?;
        Ok(Self {
            store: Arc::new(store),
            pages: Arc::new(pages),
            generate_limiter: Arc::new(GenerateRateLimiter::from_limits(&config.limits)),
            config: Arc::new(config),
        })
    }
}
