use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::error::{AppError, AppResult};

/// Per-IP limiter applied in front of every route.
pub type GlobalGovernorLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// One token every 60ms (1000 per minute), up to `burst` at once.
pub fn create_global_governor(burst: u32) -> AppResult<GlobalGovernorLayer> {
    let config = GovernorConfigBuilder::default()
        .per_millisecond(60)
        .burst_size(burst)
        .finish()
        .ok_or_else(|| AppError::Config("RATE_LIMIT_BURST must be positive".to_string()))?;

    Ok(GovernorLayer::new(Arc::new(config)))
}

pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            status = %status,
            "Request failed"
        );
    } else {
        tracing::debug!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            status = %status,
            "Request completed"
        );
    }

    response
}
