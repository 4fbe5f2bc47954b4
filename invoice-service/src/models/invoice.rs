//! Invoice model for invoice-service.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Invoice status.
///
/// Stored as text so historical free-form values keep loading; unknown values
/// fold into `Pending`, which is also the single default for new invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Pending,
    Paid,
    Unpaid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "draft" => InvoiceStatus::Draft,
            "paid" => InvoiceStatus::Paid,
            "unpaid" => InvoiceStatus::Unpaid,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Pending,
        }
    }
}

/// Invoice header record.
///
/// Invariants maintained on every write: `subtotal = Σ quantity × price` over
/// the item set and `total = subtotal + tax - discount`; `currency_symbol` is
/// derived from `currency` via the currency table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: Uuid,
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub currency_symbol: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Invoice row joined with its client's summary fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceWithClient {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub invoice: Invoice,
    pub client_name: String,
    pub client_email: String,
}

/// Fully validated invoice header, ready for persistence.
///
/// Totals are computed server-side before this struct is built; a
/// caller-supplied total never reaches the store.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub user_id: Uuid,
    pub client_id: Uuid,
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub currency_symbol: String,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub status: String,
}
