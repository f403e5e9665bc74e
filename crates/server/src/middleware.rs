//! Request-level layers: sliding-window rate limiting and performance tracking.

use std::time::Instant;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use common::observability::{observe_request, RATE_LIMITED_TOTAL};
use common::perf::{generate_request_id, RequestMetric};
use common::rate_limit::{KeyStrategy, Rule};
use common::utils::headers::{header_str, metrics_ip, rate_limit_ip};
use configs::{RateLimitConfig, RateLimitRule};
use tracing::warn;

use crate::auth::AuthUser;
use crate::errors::{rate_limit_headers, ApiError, ErrorMessage};
use crate::state::AppState;

/// Named limits applied to route groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Public,
    Api,
    Assessment,
    Bulk,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Public => "public",
            Preset::Api => "api",
            Preset::Assessment => "assessment",
            Preset::Bulk => "bulk",
        }
    }

    pub fn strategy(&self) -> KeyStrategy {
        match self {
            Preset::Public | Preset::Api => KeyStrategy::Ip,
            Preset::Assessment | Preset::Bulk => KeyStrategy::User,
        }
    }

    pub fn rule(&self, cfg: &RateLimitConfig) -> Rule {
        let r: RateLimitRule = match self {
            Preset::Public => cfg.public,
            Preset::Api => cfg.api,
            Preset::Assessment => cfg.assessment,
            Preset::Bulk => cfg.bulk,
        };
        Rule::per_secs(r.max_requests, r.window_secs)
    }
}

/// Rate-limit middleware, used as `from_fn_with_state((state, preset), rate_limit)`.
///
/// When several presets cover a route the innermost one owns the
/// `X-RateLimit-*` headers.
pub async fn rate_limit(State((state, preset)): State<(AppState, Preset)>, req: Request, next: Next) -> Response {
    if !state.rate_limits.enabled {
        return next.run(req).await;
    }
    let ip = rate_limit_ip(req.headers());
    let user = req.extensions().get::<AuthUser>().map(|u| u.id.to_string());
    let key = preset.strategy().key(preset.name(), &ip, user.as_deref());
    let decision = state.limiter.check(&key, preset.rule(&state.rate_limits));

    if !decision.allowed {
        RATE_LIMITED_TOTAL.inc();
        warn!(
            event = "rate_limited",
            preset = preset.name(),
            %key,
            path = %req.uri().path(),
            retry_after = decision.retry_after_secs()
        );
        return ApiError::RateLimited(decision).into_response();
    }

    let mut response = next.run(req).await;
    if !response.headers().contains_key("x-ratelimit-limit") {
        rate_limit_headers(response.headers_mut(), &decision);
    }
    response
}

/// Request id assigned by [`track_performance`], readable from request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Times every request, tags it with `X-Request-ID`/`X-Response-Time` and
/// feeds the Prometheus counters and the in-memory monitor.
pub async fn track_performance(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = generate_request_id();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user_agent = header_str(req.headers(), "user-agent").map(str::to_string);
    let ip = metrics_ip(req.headers());
    let organization_id = header_str(req.headers(), "x-organization-id").map(str::to_string);
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(req).await;

    let elapsed = started.elapsed();
    let response_time_ms = elapsed.as_secs_f64() * 1000.0;
    let status = response.status().as_u16();
    let slow = state.monitor.is_slow(response_time_ms);

    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&request_id) {
        headers.insert("x-request-id", v);
    }
    if let Ok(v) = HeaderValue::from_str(&format!("{:.2}ms", response_time_ms)) {
        headers.insert("x-response-time", v);
    }
    if slow {
        headers.insert("x-slow-request", HeaderValue::from_static("true"));
    }

    observe_request(&method, status, elapsed.as_secs_f64(), slow);
    state.monitor.record(RequestMetric {
        request_id,
        method,
        path,
        status_code: status,
        response_time_ms,
        timestamp: Utc::now(),
        user_agent,
        ip,
        user_id: response.extensions().get::<AuthUser>().map(|u| u.id.to_string()),
        organization_id,
        error: response.extensions().get::<ErrorMessage>().map(|e| e.0.clone()),
    });
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_follow_config() {
        let cfg = RateLimitConfig::default();
        assert_eq!(Preset::Api.rule(&cfg), Rule::per_secs(100, 900));
        assert_eq!(Preset::Public.rule(&cfg), Rule::per_secs(1000, 3600));
        assert_eq!(Preset::Assessment.rule(&cfg), Rule::per_secs(3, 3600));
        assert_eq!(Preset::Bulk.rule(&cfg), Rule::per_secs(10, 3600));
        assert_eq!(Preset::Bulk.strategy(), KeyStrategy::User);
        assert_eq!(Preset::Api.strategy(), KeyStrategy::Ip);
    }
}
