use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub games: GameInfo,
}

#[derive(Serialize)]
pub struct GameInfo {
    /// Stored scripts, or `None` when the games directory cannot be read.
    pub stored: Option<usize>,
}

/// Reports "degraded" when the games directory is unreadable, since every
/// generation would then fail.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stored = match state.store.count().await {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!("Health check could not read games directory: {e}");
            None
        },
    };

    Json(HealthResponse {
        status: if stored.is_some() { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        games: GameInfo { stored },
    })
}
