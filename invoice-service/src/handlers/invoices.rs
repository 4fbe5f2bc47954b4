//! Invoice handlers.
//!
//! Create and update run through one shared builder so the two paths can
//! never disagree on validation, defaults, or total recomputation. Totals and
//! the currency symbol are always derived server-side; caller-supplied values
//! for either are ignored by construction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

use crate::dtos::{Ack, InvoiceDetail, InvoicePayload, InvoiceResponse};
use crate::middleware::SessionUser;
use crate::models::{InvoiceStatus, NewInvoice, NewLineItem};
use crate::services::metrics::{INVOICES_TOTAL, INVOICE_AMOUNT_TOTAL};
use crate::services::totals;
use crate::startup::AppState;

/// Validate a payload and assemble a persistable header plus item rows.
///
/// Validation order: required fields and shapes, then currency allow-list,
/// then scalar money constraints. Client ownership is checked separately by
/// the callers because its failure mode differs between create and update.
fn build_invoice(
    state: &AppState,
    user_id: Uuid,
    payload: &InvoicePayload,
) -> Result<(NewInvoice, Vec<NewLineItem>), AppError> {
    payload.validate()?;

    let currency = payload
        .currency
        .clone()
        .unwrap_or_else(|| state.config.invoicing.default_currency.clone());
    let currency_symbol = state.currencies.symbol_for(&currency).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!(
            "Invalid currency '{}'; allowed: {}",
            currency,
            state.currencies.codes().join(", ")
        ))
    })?;

    let tax = payload.tax.unwrap_or(Decimal::ZERO);
    let discount = payload.discount.unwrap_or(Decimal::ZERO);
    if tax < Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "tax must not be negative"
        )));
    }
    if discount < Decimal::ZERO {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "discount must not be negative"
        )));
    }
    if let Some(item) = payload.items.iter().find(|i| i.price < Decimal::ZERO) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "price must not be negative for item '{}'",
            item.description
        )));
    }

    let pairs: Vec<(i32, Decimal)> = payload
        .items
        .iter()
        .map(|item| (item.quantity, item.price))
        .collect();
    let computed = totals::compute_totals(&pairs, tax, discount).ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("invoice amounts are too large to total"))
    })?;

    let status = payload
        .status
        .as_deref()
        .map(InvoiceStatus::from_string)
        .unwrap_or_else(|| InvoiceStatus::from_string(&state.config.invoicing.default_status));

    let header = NewInvoice {
        user_id,
        client_id: payload.client_id,
        invoice_number: payload.invoice_number.clone(),
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        currency,
        currency_symbol: currency_symbol.to_string(),
        subtotal: computed.subtotal,
        tax,
        discount,
        total: computed.total,
        notes: payload.notes.clone(),
        status: status.as_str().to_string(),
    };

    let items = payload
        .items
        .iter()
        .zip(computed.line_totals)
        .map(|(item, total)| NewLineItem {
            description: item.description.clone(),
            quantity: item.quantity,
            price: item.price,
            total,
        })
        .collect();

    Ok((header, items))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    user: SessionUser,
    Json(payload): Json<InvoicePayload>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let (header, items) = build_invoice(&state, user.user_id, &payload)?;

    // Cross-user client references are rejected before anything is written.
    if !state.db.client_owned(user.user_id, header.client_id).await? {
        return Err(AppError::Forbidden(anyhow::anyhow!("Invalid client")));
    }

    let (invoice, items) = state.db.create_invoice(&header, &items).await?;

    INVOICES_TOTAL.with_label_values(&[&invoice.status]).inc();
    // Counters cannot go backwards; a negative total is simply not recorded.
    let amount = invoice.total.to_f64().unwrap_or(0.0);
    if amount > 0.0 {
        INVOICE_AMOUNT_TOTAL
            .with_label_values(&[&invoice.currency])
            .inc_by(amount);
    }

    Ok((
        StatusCode::CREATED,
        Json(InvoiceResponse { invoice, items }),
    ))
}

pub async fn list_invoices(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<Vec<InvoiceDetail>>, AppError> {
    let invoices = state.db.list_invoices(user.user_id).await?;

    Ok(Json(
        invoices
            .into_iter()
            .map(|(invoice, items)| InvoiceDetail { invoice, items })
            .collect(),
    ))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    user: SessionUser,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<InvoiceDetail>, AppError> {
    let (invoice, items) = state
        .db
        .get_invoice(user.user_id, invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    Ok(Json(InvoiceDetail { invoice, items }))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    user: SessionUser,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<InvoicePayload>,
) -> Result<Json<Ack>, AppError> {
    let (header, items) = build_invoice(&state, user.user_id, &payload)?;

    if !state.db.client_owned(user.user_id, header.client_id).await? {
        return Err(AppError::Forbidden(anyhow::anyhow!("Invalid client")));
    }

    state
        .db
        .update_invoice(invoice_id, &header, &items)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    Ok(Json(Ack {
        success: true,
        message: "Invoice updated successfully".to_string(),
    }))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    user: SessionUser,
    Path(invoice_id): Path<Uuid>,
) -> Result<Json<Ack>, AppError> {
    let deleted = state.db.delete_invoice(user.user_id, invoice_id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!("Invoice not found")));
    }

    Ok(Json(Ack {
        success: true,
        message: "Invoice deleted successfully".to_string(),
    }))
}
