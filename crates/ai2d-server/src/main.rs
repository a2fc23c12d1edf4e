use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use ai2d_server::config::ServerConfig;
use ai2d_server::{build_app, spawn_limiter_sweeper};

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    if std::env::var("AI2D_LOG_FORMAT").is_ok_and(|f| f == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!("AI2D server starting");

    let config = ServerConfig::load();
    config.validate();
    let addr = config.listen_addr.clone();

    let (app, state) = match build_app(config) {
        Ok(built) => built,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        },
    };
    spawn_limiter_sweeper(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {addr}: {e}");
            std::process::exit(1);
        },
    };
    tracing::info!("AI2D listening on {addr}");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
