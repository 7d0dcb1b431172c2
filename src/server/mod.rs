//! HTTP surface.
//!
//! Axum server exposing the review endpoint:
//!   POST /review
//!   GET  /health
//!
//! The review route is gated by the fixed-window rate limiter; everything
//! behind it is handled by the injected [`ReviewService`].

pub mod rate_limit;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::review::ReviewService;

/// Process-wide state, initialized once at startup and injected into
/// handlers rather than referenced ad hoc.
pub struct AppContext {
    pub service: ReviewService,
    pub limiter: rate_limit::FixedWindowLimiter,
    pub started_at: Instant,
}

impl AppContext {
    pub fn new(service: ReviewService, limiter: rate_limit::FixedWindowLimiter) -> Self {
        Self {
            service,
            limiter,
            started_at: Instant::now(),
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn start_server(ctx: Arc<AppContext>, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind.parse()?;
    let router = build_router(ctx);

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

/// Assemble the router. The rate limiter applies to the review route only;
/// health stays reachable for probes.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/review", post(routes::review_code))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&ctx),
            rate_limit::enforce,
        ))
        .route("/health", get(routes::health))
        .with_state(ctx)
}
