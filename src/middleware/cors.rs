//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native mobile apps and server-to-server calls are not
//!   restricted by CORS.
//! - This middleware should be applied at the Router level (not inside handlers).
//!
//! Responsibility:
//! - Provide a consistent CORS policy for the `/api` subtree.
//!
//! Policy:
//! - Allow only configured origins (exact match), WITH credentials.
//! - Methods GET/POST/PUT/DELETE/OPTIONS, headers Content-Type/Authorization.
//! - Preflight OPTIONS is answered by the layer itself (200, empty body).

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::state::AppState;

/// Apply CORS policy to the given Router.
///
/// IMPORTANT:
/// - Never switch the origin to a wildcard here: `allow_credentials(true)`
///   requires exact origins. An empty allowlist intentionally allows none.
pub fn apply(router: Router<AppState>, config: &Config) -> Router<AppState> {
    let allowed: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    router.layer(cors)
}
