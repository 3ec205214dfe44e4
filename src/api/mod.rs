pub mod error;
pub mod fixtures;

pub use error::ApiError;

use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::football_data::FixtureSource;

/// Request headers browsers may send cross-origin.
const ALLOWED_HEADERS: [&str; 9] = [
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FixtureSource>,
    pub default_league: String,
    /// Sent on successful fixtures responses only
    pub cache_control: HeaderValue,
}

/// Build the Axum router. `/api/fixtures` is kept as an alias of
/// `/fixtures` for clients of the old serverless path.
pub fn router(state: AppState) -> Router {
    let fixtures = get(fixtures::fixtures_handler).fallback(method_not_allowed);

    Router::new()
        .route("/fixtures", fixtures.clone())
        .route("/api/fixtures", fixtures)
        .route("/health", get(health_handler))
        .layer(cors_layer())
        .with_state(Arc::new(state))
}

/// Allow-all CORS. The layer answers every OPTIONS request itself with an
/// empty 200, which is the preflight behaviour we want.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

/// GET /health
async fn health_handler() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
