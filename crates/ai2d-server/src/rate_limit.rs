use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tokio::sync::Mutex;

use crate::config::LimitsConfig;
use crate::error::AppError;
use crate::state::AppState;

struct Bucket {
    tokens: f64,
    last_seen: Instant,
}

/// Per-IP token bucket guarding `/generate`, which writes two files per call.
pub struct GenerateRateLimiter {
    buckets: Mutex<HashMap<IpAddr, Bucket>>,
    burst: f64,
    per_sec: f64,
}

impl GenerateRateLimiter {
    pub fn new(burst: f64, per_sec: f64) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            burst,
            per_sec,
        }
    }

    pub fn from_limits(limits: &LimitsConfig) -> Self {
        Self::new(
            limits.generate_rate_limit_burst as f64,
            limits.generate_rate_limit_per_sec,
        )
    }

    /// Take one token for `ip`. Returns `false` when the bucket is empty.
    pub async fn try_acquire(&self, ip: IpAddr) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(ip).or_insert(Bucket {
            tokens: self.burst,
            last_seen: now,
        });

        let elapsed = now.duration_since(bucket.last_seen).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.per_sec).min(self.burst);
        bucket.last_seen = now;

        if bucket.tokens < 1.0 {
            return false;
        }
        bucket.tokens -= 1.0;
        true
    }

    /// Forget buckets idle for at least `max_idle`.
    pub async fn prune(&self, max_idle: Duration) {
        let now = Instant::now();
        self.buckets
            .lock()
            .await
            .retain(|_, b| now.duration_since(b.last_seen) < max_idle);
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.buckets.lock().await.len()
    }
}

/// Route middleware rejecting over-limit callers with 429.
pub async fn limit_generate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));

    if !state.generate_limiter.try_acquire(ip).await {
        tracing::warn!(%ip, "Generate rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}
