// src/presentation/http/middleware/rate_limit.rs
use ::governor::middleware::NoOpMiddleware;
use axum::body::Body;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Per-client-IP limiter for the credential endpoints: a burst of 10
/// attempts, then one more every 2 seconds.
///
/// The client IP comes from forwarding headers or the peer address, so the
/// server must be started with connect info.
pub fn rate_limit_layer() -> Option<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware, Body>> {
    let mut builder = GovernorConfigBuilder::default();
    builder.per_second(2);
    builder.burst_size(10);
    let config = builder.key_extractor(SmartIpKeyExtractor).finish()?;

    Some(GovernorLayer::new(config))
}
