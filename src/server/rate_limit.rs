//! Fixed-window rate limiting per client address.
//!
//! Each client IP gets `max_requests` per `window`; the window resets as a
//! whole rather than sliding. Applied as middleware in front of the review
//! route, before the orchestrator runs.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tracing::debug;

use super::routes::ApiError;
use super::AppContext;

/// Evict stale windows once the tracker grows past this many clients.
const MAX_TRACKED_CLIENTS: usize = 10_000;

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter keyed by client IP.
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Count one request against `client`. Returns `false` when the client
    /// has exhausted the current window.
    pub async fn try_acquire(&self, client: IpAddr) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        if windows.len() > MAX_TRACKED_CLIENTS {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let slot = windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(slot.started) >= self.window {
            slot.started = now;
            slot.count = 0;
        }

        if slot.count >= self.max_requests {
            debug!(%client, "rate limit window exhausted");
            return false;
        }

        slot.count += 1;
        true
    }
}

/// Middleware: reject the request with 429 when the client's window is
/// exhausted, pass it through otherwise.
///
/// `ConnectInfo` is absent when the router is driven outside a real TCP
/// listener (tests); those callers share one unspecified-address bucket.
pub async fn enforce(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    if !ctx.limiter.try_acquire(client).await {
        return ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Try again later.",
        )
        .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[tokio::test]
    async fn allows_up_to_the_limit() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.try_acquire(client(1)).await);
        }
        assert!(!limiter.try_acquire(client(1)).await);
    }

    #[tokio::test]
    async fn clients_are_limited_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.try_acquire(client(1)).await);
        assert!(!limiter.try_acquire(client(1)).await);
        assert!(limiter.try_acquire(client(2)).await);
    }

    #[tokio::test]
    async fn window_resets_after_elapsing() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_millis(20));
        assert!(limiter.try_acquire(client(1)).await);
        assert!(!limiter.try_acquire(client(1)).await);

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(limiter.try_acquire(client(1)).await);
    }
}
