//! HTTP routes for the proxy endpoints.
//!
//! Two GET endpoints plus OPTIONS preflight. Every response, success or
//! error, carries permissive CORS headers and a public cache-control
//! directive so a fronting CDN can absorb repeat traffic.

pub mod alerts;
pub mod park_info;

use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;

use crate::nps::NpsClient;
use trailguide_core::{AppConfig, Error};

/// Shared state for the proxy handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub nps: NpsClient,
}

/// Build the proxy router.
pub fn router(config: &AppConfig) -> Result<Router, Error> {
    let state = AppState { config: Arc::new(config.clone()), nps: NpsClient::new(config)? };

    Ok(Router::new()
        .route("/api/alerts", get(alerts::handle).options(preflight))
        .route("/api/park-info", get(park_info::handle).options(preflight))
        .layer(middleware::from_fn(cors_and_cache))
        .with_state(state))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// CORS and cache-control headers for every response on these routes.
///
/// park-info is cached for an hour, alerts for 30 minutes, matching how
/// quickly each payload goes stale.
async fn cors_and_cache(request: Request, next: Next) -> Response {
    let cache_control = if request.uri().path() == "/api/park-info" {
        "s-maxage=3600, stale-while-revalidate=7200"
    } else {
        "s-maxage=1800, stale-while-revalidate=3600"
    };

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    response
}

/// Timestamp format used in proxy payloads.
pub(crate) fn fetched_at() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_builds() {
        let router = router(&AppConfig::default());
        assert!(router.is_ok());
    }

    #[test]
    fn test_fetched_at_is_utc_iso8601() {
        let stamp = fetched_at();
        assert!(stamp.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());
    }
}
