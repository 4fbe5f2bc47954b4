//! Request and response bodies for the HTTP surface.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Invoice, InvoiceWithClient, LineItem, User};
use crate::services::database::{MonthlyRevenue, RecentInvoice, StatusCount};

/// Identity-provider sign-in boundary: upsert a user keyed by email.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub user: User,
}

/// Client create/update body. Name and email are mandatory.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientPayload {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
}

/// One line item as submitted by the caller.
///
/// The item's amount is always recomputed server-side; there is no `total`
/// field here on purpose.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemPayload {
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    pub price: Decimal,
}

/// Invoice create/update body, shared by both paths so validation and total
/// recomputation cannot diverge between them.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoicePayload {
    pub client_id: Uuid,
    #[validate(length(min = 1, message = "invoice_number is required"))]
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(length(min = 1, message = "at least one item is required"), nested)]
    pub items: Vec<LineItemPayload>,
    pub status: Option<String>,
    pub tax: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub notes: Option<String>,
    pub currency: Option<String>,
}

/// A persisted invoice with its items, as returned by create and update.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub items: Vec<LineItem>,
}

/// An invoice with client summary and items, as returned by get and list.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: InvoiceWithClient,
    pub items: Vec<LineItem>,
}

/// Success acknowledgement for mutations that return no body.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

/// Read-only dashboard rollup for one user.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub total_invoices: i64,
    pub total_revenue: Decimal,
    pub status_counts: Vec<StatusCount>,
    pub overdue_invoices: i64,
    pub recent_invoices: Vec<RecentInvoice>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}
