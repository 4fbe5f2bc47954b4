//! Identity-provider boundary.

use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{SignInRequest, SignInResponse};
use crate::startup::AppState;

/// Upsert-or-create a user on successful external sign-in.
///
/// The caller (the frontend that drove the identity-provider flow) receives
/// the internal user id and attaches it to every subsequent request.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<(StatusCode, Json<SignInResponse>), AppError> {
    payload.validate()?;

    let user = state
        .db
        .upsert_user(
            &payload.email,
            payload.name.as_deref(),
            payload.image_url.as_deref(),
        )
        .await?;

    Ok((StatusCode::OK, Json(SignInResponse { user })))
}
