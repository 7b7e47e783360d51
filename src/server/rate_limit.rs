//! Fixed-window request limiter keyed by client address

use axum::http::{HeaderMap, HeaderValue};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::RateLimitConfig;

struct Window {
    count: u32,
    reset_at: Instant,
}

/// Result of one check, with everything needed for the response headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes
    pub reset_in: Duration,
}

impl RateLimitStatus {
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_in.as_secs();
        if self.reset_in.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }

    /// `X-RateLimit-*` headers, plus `Retry-After` when the request was refused
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let reset_at = chrono::Utc::now()
            + chrono::Duration::from_std(self.reset_in).unwrap_or_else(|_| chrono::Duration::zero());

        headers.insert("x-ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("x-ratelimit-remaining", HeaderValue::from(self.remaining));
        if let Ok(value) = HeaderValue::from_str(&reset_at.to_rfc3339()) {
            headers.insert("x-ratelimit-reset", value);
        }
        if !self.allowed {
            headers.insert("retry-after", HeaderValue::from(self.retry_after_secs()));
        }
        headers
    }
}

pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    /// Count one request from `key` and decide whether it may proceed
    pub async fn check(&self, key: &str) -> RateLimitStatus {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let window = windows
            .entry(key.to_string())
            .or_insert_with(|| Window {
                count: 0,
                reset_at: now + self.window,
            });
        if now > window.reset_at {
            window.count = 0;
            window.reset_at = now + self.window;
        }

        let reset_in = window.reset_at.saturating_duration_since(now);
        if window.count >= self.max_requests {
            tracing::debug!(client = key, "rate limit exceeded");
            return RateLimitStatus {
                allowed: false,
                limit: self.max_requests,
                remaining: 0,
                reset_in,
            };
        }

        window.count += 1;
        RateLimitStatus {
            allowed: true,
            limit: self.max_requests,
            remaining: self.max_requests - window.count,
            reset_in,
        }
    }

    /// Drop windows that have closed; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, window| now <= window.reset_at);
        before - windows.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

/// First `x-forwarded-for` hop, else the peer address
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let ip = match (forwarded, peer) {
        (Some(ip), _) => ip.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    };
    format!("ratelimit:{}", ip)
}
