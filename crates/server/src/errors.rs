use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::rate_limit::RateLimitDecision;
use contracts::{ErrorResponse, ValidationErrors};
use serde_json::json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Failure message attached to error responses so request metrics can record it.
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("authentication failed: {0}")]
    Unauthenticated(String),
    #[error("rate limit exceeded")]
    RateLimited(RateLimitDecision),
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::Service(ServiceError::Validation(e))
    }
}

impl ApiError {
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(e) => match e {
                ServiceError::Validation(_) | ServiceError::BadRequest(_) | ServiceError::ForeignKey(_) => {
                    StatusCode::BAD_REQUEST
                }
                ServiceError::NotFound { .. } | ServiceError::Missing(_) => StatusCode::NOT_FOUND,
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::Db(_) | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Service(e) => {
                let message = e.public_message();
                match e {
                    ServiceError::Validation(errors) => ErrorResponse::new("Validation Error", message, "VALIDATION_ERROR")
                        .with_details(serde_json::to_value(errors).unwrap_or_default()),
                    ServiceError::BadRequest(_) => ErrorResponse::new("Validation Error", message, "VALIDATION_ERROR"),
                    ServiceError::ForeignKey(constraint) => ErrorResponse::new("Validation Error", message, "VALIDATION_ERROR")
                        .with_details(json!({ "constraint": constraint })),
                    ServiceError::NotFound { .. } | ServiceError::Missing(_) => {
                        ErrorResponse::new("Not Found", message, "NOT_FOUND")
                    }
                    ServiceError::Forbidden(_) => ErrorResponse::new("Authorization Error", message, "AUTHORIZATION_ERROR"),
                    ServiceError::Conflict(_) => ErrorResponse::new("Conflict", message, "CONFLICT"),
                    ServiceError::Db(_) => ErrorResponse::new("Database Error", message, "DATABASE_ERROR"),
                    ServiceError::Internal(_) => {
                        ErrorResponse::new("Internal Server Error", message, "INTERNAL_SERVER_ERROR")
                    }
                }
            }
            ApiError::Unauthenticated(message) => {
                ErrorResponse::new("Authentication Error", message.clone(), "AUTHENTICATION_ERROR")
            }
            ApiError::RateLimited(d) => {
                ErrorResponse::new("Rate Limit Exceeded", "Too many requests, please try again later", "RATE_LIMIT_EXCEEDED")
                    .with_details(json!({
                        "limit": d.limit,
                        "remaining": d.remaining,
                        "resetTime": d.reset_at_epoch_secs(),
                        "retryAfter": d.retry_after_secs(),
                    }))
            }
        }
    }
}

/// `X-RateLimit-*` headers for a limiter decision.
pub fn rate_limit_headers(headers: &mut HeaderMap, d: &RateLimitDecision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(d.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(d.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(d.reset_at_epoch_secs()));
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // internals stay in the log, the body carries the public message only
            error!(event = "request_failed", status = status.as_u16(), error = %self);
        }
        let body = self.body();
        let message = body.message.clone();
        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited(d) = &self {
            let headers = response.headers_mut();
            rate_limit_headers(headers, d);
            headers.insert(header::RETRY_AFTER, HeaderValue::from(d.retry_after_secs()));
        }
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}
