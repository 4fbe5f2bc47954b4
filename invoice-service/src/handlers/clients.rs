//! Client CRUD handlers. Every operation is scoped to the session user.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{Ack, ClientPayload};
use crate::middleware::SessionUser;
use crate::models::{Client, ClientFields, Invoice};
use crate::startup::AppState;

impl From<ClientPayload> for ClientFields {
    fn from(payload: ClientPayload) -> Self {
        ClientFields {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            company: payload.company,
            address: payload.address,
        }
    }
}

pub async fn create_client(
    State(state): State<AppState>,
    user: SessionUser,
    Json(payload): Json<ClientPayload>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    payload.validate()?;

    let client = state
        .db
        .create_client(user.user_id, &payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = state.db.list_clients(user.user_id).await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    user: SessionUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    let client = state
        .db
        .get_client(user.user_id, client_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    Ok(Json(client))
}

pub async fn update_client(
    State(state): State<AppState>,
    user: SessionUser,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<ClientPayload>,
) -> Result<Json<Client>, AppError> {
    payload.validate()?;

    let client = state
        .db
        .update_client(user.user_id, client_id, &payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Client not found")))?;

    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    user: SessionUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    let deleted = state.db.delete_client(user.user_id, client_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Client not found")));
    }

    Ok(Json(Ack {
        success: true,
        message: "Client deleted successfully".to_string(),
    }))
}

/// Invoices referencing one client, for the client detail view.
pub async fn list_client_invoices(
    State(state): State<AppState>,
    user: SessionUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    // 404 for a client the caller does not own, same as a missing one.
    if !state.db.client_owned(user.user_id, client_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Client not found")));
    }

    let invoices = state
        .db
        .list_client_invoices(user.user_id, client_id)
        .await?;

    Ok(Json(invoices))
}
