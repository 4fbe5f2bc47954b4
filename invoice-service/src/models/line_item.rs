//! Line item model for invoice-service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One billable row belonging to exactly one invoice.
///
/// Items have no stable identity across edits: an invoice update replaces the
/// entire item set, so ids are regenerated on every update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub total: Decimal,
}

/// Input for inserting a line item, with its amount already computed.
#[derive(Debug, Clone)]
pub struct NewLineItem {
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub total: Decimal,
}
