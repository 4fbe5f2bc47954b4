//! Session context extraction.
//!
//! The identity-provider-facing frontend authenticates the user, resolves the
//! internal user id via `POST /session/sign-in`, and attaches it to every
//! subsequent request. This service never initiates authentication itself; it
//! only enforces that a resolved session user is present.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;
use uuid::Uuid;

/// Authenticated user context for one request.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Internal user id every read and write is scoped to.
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing X-User-ID header")))?;

        let user_id = Uuid::parse_str(user_id)
            .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("Invalid X-User-ID header")))?;

        let email = parts
            .headers
            .get("X-User-Email")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let span = tracing::Span::current();
        span.record("user_id", user_id.to_string().as_str());

        Ok(SessionUser { user_id, email })
    }
}
