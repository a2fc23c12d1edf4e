use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ai2d_server::build_app;
use ai2d_server::config::{LimitsConfig, ServerConfig};

pub struct TestServer {
    pub addr: SocketAddr,
    pub static_root: PathBuf,
    _dir: tempfile::TempDir,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server on an ephemeral port with its own static root.
    pub async fn new() -> Self {
        Self::from_config(ServerConfig::default()).await
    }

    /// Start a test server with a tight `/generate` rate limit and no refill.
    pub async fn with_generate_burst(burst: usize) -> Self {
        let config = ServerConfig {
            limits: LimitsConfig {
                generate_rate_limit_burst: burst,
                generate_rate_limit_per_sec: 0.000_001,
                ..LimitsConfig::default()
            },
            ..ServerConfig::default()
        };
        Self::from_config(config).await
    }

    pub async fn from_config(mut config: ServerConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let static_root = dir.path().join("static");
        config.static_root = static_root.to_string_lossy().into_owned();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, _state) = build_app(config).unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            static_root,
            _dir: dir,
            _shutdown: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn logic_file(&self, game_id: &str) -> PathBuf {
        self.static_root.join("game_logic").join(format!("{game_id}.json"))
    }

    pub fn script_file(&self, game_id: &str) -> PathBuf {
        self.static_root.join("games").join(format!("{game_id}.js"))
    }
}

/// POST a prompt to `/generate` as a form.
pub async fn generate(server: &TestServer, prompt: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/generate", server.base_url()))
        .form(&[("prompt", prompt)])
        .send()
        .await
        .unwrap()
}

/// POST a prompt and return the parsed success body.
pub async fn generate_ok(server: &TestServer, prompt: &str) -> serde_json::Value {
    let resp = generate(server, prompt).await;
    assert_eq!(resp.status(), 200, "generate failed for {prompt:?}");
    resp.json().await.unwrap()
}
