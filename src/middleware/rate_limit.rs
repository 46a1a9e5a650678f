use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

const WINDOW: Duration = Duration::from_secs(60);

/// In-memory sliding-window request limiter keyed by client address.
pub struct RateLimiter {
    requests_per_minute: u32,
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        tracing::info!(requests_per_minute, "Rate limiter initialized");
        Self {
            requests_per_minute,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Record a request for `client` and report whether it is within limits.
    pub fn is_allowed(&self, client: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().unwrap_or_else(|e| e.into_inner());

        let window = windows.entry(client.to_string()).or_default();
        window.retain(|seen| now.duration_since(*seen) < WINDOW);

        if window.len() >= self.requests_per_minute as usize {
            return false;
        }

        window.push(now);
        true
    }
}

/// Client key: first hop of `x-forwarded-for`, since the service is expected
/// to sit behind a reverse proxy.
fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(request.headers());

    if !limiter.is_allowed(&client) {
        tracing::warn!(
            client = %client,
            path = request.uri().path(),
            "Rate limit exceeded"
        );
        return AppError::RateLimited { retry_after: 60 }.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_requests_over_limit_are_rejected() {
        let limiter = RateLimiter::new(3);

        for _ in 0..3 {
            assert!(limiter.is_allowed("10.0.0.1"));
        }
        assert!(!limiter.is_allowed("10.0.0.1"));
    }

    #[test]
    fn test_clients_have_independent_windows() {
        let limiter = RateLimiter::new(1);

        assert!(limiter.is_allowed("10.0.0.1"));
        assert!(!limiter.is_allowed("10.0.0.1"));
        assert!(limiter.is_allowed("10.0.0.2"));
    }

    #[test]
    fn test_client_key_takes_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers), "203.0.113.9");
    }

    #[test]
    fn test_client_key_without_header() {
        assert_eq!(client_key(&HeaderMap::new()), "unknown");
    }
}
