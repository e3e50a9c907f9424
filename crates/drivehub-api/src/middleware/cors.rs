//! CORS layer built from `server.cors`.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, Any, CorsLayer};
use tracing::warn;

use drivehub_core::config::CorsConfig;

pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if CorsConfig::is_wildcard(&config.allowed_origins) {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(parse_all::<HeaderValue>("origin", &config.allowed_origins))
    };

    let headers = if CorsConfig::is_wildcard(&config.allowed_headers) {
        AllowHeaders::from(Any)
    } else {
        AllowHeaders::list(parse_all::<HeaderName>("header", &config.allowed_headers))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(parse_all::<Method>("method", &config.allowed_methods))
        .allow_headers(headers)
        .expose_headers(parse_all::<HeaderName>("header", &config.exposed_headers))
        .max_age(Duration::from_secs(config.max_age_seconds))
}

/// Parses every entry, skipping (and logging) the ones that are not valid.
fn parse_all<T: FromStr>(what: &str, entries: &[String]) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| match entry.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(kind = what, value = %entry, "Ignoring invalid CORS entry");
                None
            }
        })
        .collect()
}
