//! Bearer/cookie JWT verification for tokens issued by the identity provider.
//!
//! Tokens are HS256-signed with the provider's shared secret. `exp` is
//! required and `sub` carries the user id. Browsers that do not send an
//! `Authorization` header are authenticated through the provider's session
//! cookie instead.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use configs::AuthConfig;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// The verified caller. Handlers take it as an extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub role: Option<String>,
}

pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    cookie_name: String,
}

impl JwtVerifier {
    pub fn new(cfg: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        match cfg.audience.as_deref() {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }
        Self {
            key: DecodingKey::from_secret(cfg.jwt_secret.as_bytes()),
            validation,
            cookie_name: cfg.session_cookie.clone(),
        }
    }

    /// Token from `Authorization: Bearer`, else the session cookie.
    pub fn token_from(&self, headers: &HeaderMap) -> Option<String> {
        let bearer = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(token) = bearer {
            return Some(token.to_string());
        }
        CookieJar::from_headers(headers)
            .get(&self.cookie_name)
            .map(|c| c.value().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, ApiError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::unauthenticated("Token expired"),
                _ => ApiError::unauthenticated("Invalid token"),
            }
        })?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| ApiError::unauthenticated("Invalid token subject"))?;
        Ok(AuthUser { id, email: data.claims.email, role: data.claims.role })
    }

    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
        let token = self.token_from(headers).ok_or_else(|| ApiError::unauthenticated("Authentication required"))?;
        self.verify(&token)
    }
}

/// Rejects unauthenticated requests with 401. The verified user is stored in
/// the request extensions and copied onto the response for request metrics.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let user = match state.auth.authenticate(req.headers()) {
        Ok(user) => user,
        Err(e) => {
            warn!(event = "auth_rejected", path = %req.uri().path(), reason = %e);
            return e.into_response();
        }
    };
    req.extensions_mut().insert(user.clone());
    let mut response = next.run(req).await;
    response.extensions_mut().insert(user);
    response
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthenticated("Authentication required"))
    }
}
