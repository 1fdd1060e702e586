/// Middleware for the API server
///
/// - `trusted_host`: Host header allow-list
///
/// [`register_middleware`] installs the whole stack on a router. Applied
/// outermost first:
///
/// 1. Trusted host check
/// 2. CORS
/// 3. Request tracing (tower-http `TraceLayer`)

pub mod trusted_host;

use axum::{http::HeaderValue, Router};
use std::time::Duration;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::ApiConfig;
use trusted_host::TrustedHostLayer;

/// CORS policy for the configured origins
///
/// `*` allows any origin. Credentials are allowed either way, so the request
/// origin, method and headers are mirrored back instead of answered with a
/// wildcard.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::very_permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Installs tracing, CORS and the trusted host check
pub fn register_middleware<S>(router: Router<S>, config: &ApiConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .layer(cors_layer(&config.cors_origins))
        .layer(TrustedHostLayer::new(config.allowed_hosts.clone()))
}
