pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod pages;
pub mod rate_limit;
pub mod state;
pub mod storage;

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use config::{CorsConfig, ServerConfig};
use state::{AppState, StartupError};

/// How often idle rate-limit buckets are swept.
const LIMITER_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
/// Buckets idle this long are dropped.
const LIMITER_MAX_IDLE: Duration = Duration::from_secs(600);

/// Build the Axum router and application state from a config. Creates the
/// game directories under `static_root` if they are missing.
pub fn build_app(config: ServerConfig) -> Result<(Router<()>, AppState), StartupError> {
    let static_root = config.static_root.clone();
    let timeout = Duration::from_secs(config.limits.request_timeout_secs);
    let cors = cors_layer(&config.cors);
    let state = AppState::new(config)?;

    let generate = post(api::generate).route_layer(middleware::from_fn_with_state(
        state.clone(),
        rate_limit::limit_generate,
    ));

    let app = Router::new()
        .route("/", get(api::index))
        .route("/generate", generate)
        .route("/play/{game_id}", get(api::play))
        .route("/game-logic/{game_id}", get(api::game_logic))
        .route("/health", get(health::health_check))
        .nest_service("/static", ServeDir::new(&static_root))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(request_timeout(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((app, state))
}

/// Requests running past `timeout` are answered with 408.
fn request_timeout(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    if cfg.allows_any() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Background task that periodically drops idle rate-limit buckets so the
/// map does not grow with every client ever seen.
pub fn spawn_limiter_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            state.generate_limiter.prune(LIMITER_MAX_IDLE).await;
        }
    });
}
