use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::jwt::Claims;
use crate::error::ApiError;
use crate::schemas::AppState;

/// Authenticated caller, extracted from `Authorization: Bearer <token>`.
///
/// Authentication is an input type here: a handler that takes an
/// `AuthUser` cannot run without a verified token, and the claims it
/// receives are what the authorization predicates in
/// [`crate::auth::policy`] consume. There is no ordering to get wrong.
///
/// ```rust,ignore
/// async fn protected(AuthUser(claims): AuthUser) -> impl IntoResponse {
///     format!("hello {}", claims.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized)?;

        let claims = state
            .tokens
            .verify(token)
            .map_err(|e| ApiError::InvalidToken(e.to_string()))?;

        Ok(AuthUser(claims))
    }
}
