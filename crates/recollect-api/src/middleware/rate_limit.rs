//! Global request quota.

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use governor::{Quota, RateLimiter};

use crate::config::ApiConfig;
use crate::AppState;

pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Build the limiter described by the config, `None` when disabled.
///
/// The quota allows a burst of `rate_limit_requests` and replenishes one
/// request every `rate_limit_period / rate_limit_requests`.
pub fn build_rate_limiter(config: &ApiConfig) -> Option<Arc<GlobalRateLimiter>> {
    if !config.rate_limit_enabled {
        return None;
    }
    let quota = NonZeroU32::new(config.rate_limit_requests).and_then(|burst| {
        Quota::with_period(config.rate_limit_period / burst.get()).map(|q| q.allow_burst(burst))
    });
    match quota {
        Some(quota) => Some(Arc::new(RateLimiter::direct(quota))),
        None => {
            tracing::warn!(
                subsystem = "api",
                component = "rate_limit",
                requests = config.rate_limit_requests,
                period_ms = config.rate_limit_period.as_millis() as u64,
                "Rate limit quota is unrepresentable, rate limiting disabled"
            );
            None
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(subsystem = "api", component = "rate_limit", "Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "data": null,
                    "error": "rate_limit_exceeded",
                    "message": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}
