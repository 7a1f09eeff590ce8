use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::auth::claims::AuthenticatedUser;
use crate::auth::jwt::TokenCodec;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Pull the token out of the `Authorization` header.
///
/// The value must be exactly two space-separated parts with the first the
/// literal `Bearer`. Header name lookup is case-insensitive.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

/// Authenticate a request from its headers.
///
/// Precedence: a missing or malformed credential is reported before a
/// missing signing secret; any verification failure after that collapses to
/// the codec's generic classifications.
pub fn authenticate(
    headers: &HeaderMap,
    config: &AppConfig,
) -> Result<AuthenticatedUser, ApiError> {
    let token = extract_bearer_token(headers).ok_or_else(|| {
        ApiError::Authentication("Missing or invalid Authorization header".into())
    })?;
    let codec = TokenCodec::from_config(config)?;
    codec.verify(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, &state.config)
    }
}
