use serde::Deserialize;

/// Top-level server configuration, loaded from `ai2d.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Directory served under `/static`; generated games are written here.
    pub static_root: String,
    pub cors: CorsConfig,
    pub limits: LimitsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            static_root: "static".to_string(),
            cors: CorsConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

/// Cross-origin settings. `"*"` allows any origin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Longest accepted prompt, in bytes.
    pub max_prompt_len: usize,
    /// `/generate` rate limit: max burst tokens per IP.
    pub generate_rate_limit_burst: usize,
    /// `/generate` rate limit: token refill rate (requests per second) per IP.
    pub generate_rate_limit_per_sec: f64,
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_prompt_len: 2000,
            generate_rate_limit_burst: 20,
            generate_rate_limit_per_sec: 2.0,
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Every problem that makes this config unusable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            problems.push(format!(
                "listen_addr {:?} is not a valid socket address",
                self.listen_addr
            ));
        }
        if self.static_root.is_empty() {
            problems.push("static_root must not be empty".to_string());
        }
        if self.limits.max_prompt_len == 0 {
            problems.push("limits.max_prompt_len must be > 0".to_string());
        }
        if self.limits.generate_rate_limit_burst == 0 {
            problems.push("limits.generate_rate_limit_burst must be > 0".to_string());
        }
        let per_sec = self.limits.generate_rate_limit_per_sec;
        if !per_sec.is_finite() || per_sec <= 0.0 {
            problems.push(
                "limits.generate_rate_limit_per_sec must be a finite number > 0".to_string(),
            );
        }
        if self.limits.request_timeout_secs == 0 {
            problems.push("limits.request_timeout_secs must be > 0".to_string());
        }
        problems
    }

    /// Validate configuration, exiting the process on fatal problems.
    pub fn validate(&self) {
        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("cors.allowed_origins is empty; cross-origin requests will be refused");
        }
        let problems = self.problems();
        if !problems.is_empty() {
            for problem in &problems {
                tracing::error!("{problem}");
            }
            std::process::exit(1);
        }
    }

    /// Load config from `ai2d.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string("ai2d.toml") {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from ai2d.toml");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse ai2d.toml: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No ai2d.toml found, using defaults");
                ServerConfig::default()
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply `AI2D_*` overrides from `lookup`. Empty and unparsable values
    /// are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = var("AI2D_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(root) = var("AI2D_STATIC_ROOT") {
            self.static_root = root;
        }
        if let Some(origins) = var("AI2D_CORS_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(n) = var("AI2D_MAX_PROMPT_LEN").and_then(|v| v.parse::<usize>().ok()) {
            self.limits.max_prompt_len = n;
        }
        if let Some(n) = var("AI2D_GENERATE_RATE_LIMIT").and_then(|v| v.parse::<f64>().ok()) {
            self.limits.generate_rate_limit_per_sec = n;
        }
    }
}
