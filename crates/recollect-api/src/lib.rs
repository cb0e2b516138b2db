//! # recollect-api
//!
//! HTTP surface for bookmark ingestion: configuration, routing, middleware,
//! error mapping and the ingestion services behind the handlers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use recollect_core::defaults::CORS_MAX_AGE_SECS;

pub use config::ApiConfig;
pub use error::ApiError;
use middleware::{build_rate_limiter, rate_limit_middleware, GlobalRateLimiter};
use services::IngestService;
use uuid::Uuid;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
    /// Global rate limiter (None if rate limiting is disabled).
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}

impl AppState {
    pub fn new(ingest: IngestService, config: &ApiConfig) -> Self {
        Self {
            ingest: Arc::new(ingest),
            rate_limiter: build_rate_limiter(config),
        }
    }
}

/// Build the application router with every middleware layer applied.
pub fn router(state: AppState, config: &ApiConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/bookmark/add-bookmark-min-data",
            post(handlers::add_bookmark_min_data),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(&config.allowed_origins))
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(origins)))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(CORS_MAX_AGE_SECS))
}

/// Convert configured origins to header values, skipping invalid entries.
fn parse_allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}
