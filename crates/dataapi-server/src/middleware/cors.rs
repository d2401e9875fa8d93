//! CORS middleware.
//!
//! Wrapper around tower-http CORS with the Data API configuration.

use crate::domain::config::{CorsConfig, ServerMode};
use axum::http::{HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Create the CORS layer for the given mode.
///
/// Release mode only admits the configured origins. Debug mode admits any
/// origin by mirroring it back, since a literal `*` is rejected by browsers
/// once credentials are allowed.
pub fn create_cors_layer(config: &CorsConfig, mode: ServerMode) -> CorsLayer {
    let origin = if mode.is_release() {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = %o, "ignoring unparsable cors origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    } else {
        AllowOrigin::mirror_request()
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_credentials(config.allow_credentials)
        .max_age(Duration::from_secs(config.max_age))
}
