//! Extractors that turn axum rejections into `VALIDATION_ERROR` responses.

use async_trait::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, OriginalUri, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use common::utils::headers::{header_str, metrics_ip};
use contracts::ValidationErrors;
use serde::de::DeserializeOwned;
use service::audit::RequestContext;

use crate::errors::ApiError;
use crate::middleware::RequestId;

pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let code = match rejection {
        JsonRejection::MissingJsonContentType(_) => "invalid_content_type",
        JsonRejection::JsonSyntaxError(_) => "invalid_json",
        _ => "invalid_type",
    };
    ValidationErrors::single("body", rejection.body_text(), code).into()
}

pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(v)| Self(v))
            .map_err(|e: QueryRejection| ValidationErrors::single("query", e.body_text(), "invalid_type").into())
    }
}

pub struct ValidPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(v)| Self(v))
            .map_err(|e: PathRejection| ValidationErrors::single("params", e.body_text(), "invalid_string").into())
    }
}

/// Request attributes recorded on audit rows.
pub struct AuditContext(pub RequestContext);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuditContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // nested routers strip their prefix from `parts.uri`
        let path = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(uri)) => uri.path().to_string(),
            None => parts.uri.path().to_string(),
        };
        Ok(Self(RequestContext {
            request_id: parts.extensions.get::<RequestId>().map(|r| r.0.clone()),
            ip_address: metrics_ip(&parts.headers),
            user_agent: header_str(&parts.headers, "user-agent").map(str::to_string),
            endpoint: Some(path),
            http_method: Some(parts.method.to_string()),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Uri;

    async fn context_of(req: Request<Body>) -> RequestContext {
        let (mut parts, _) = req.into_parts();
        match AuditContext::from_request_parts(&mut parts, &()).await {
            Ok(AuditContext(ctx)) => ctx,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn endpoint_keeps_the_mount_prefix() {
        let mut req = axum::http::Request::builder().method("DELETE").uri("/users/42").body(Body::empty()).unwrap();
        req.extensions_mut().insert(OriginalUri(Uri::from_static("/api/users/42")));
        let ctx = context_of(req).await;
        assert_eq!(ctx.endpoint.as_deref(), Some("/api/users/42"));
        assert_eq!(ctx.http_method.as_deref(), Some("DELETE"));
    }

    #[tokio::test]
    async fn endpoint_falls_back_to_request_path() {
        let req = axum::http::Request::builder().uri("/health?verbose=1").body(Body::empty()).unwrap();
        assert_eq!(context_of(req).await.endpoint.as_deref(), Some("/health"));
    }
}
