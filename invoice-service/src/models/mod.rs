//! Domain models for invoice-service.

pub mod client;
pub mod currency;
pub mod invoice;
pub mod line_item;
pub mod user;

pub use client::{Client, ClientFields};
pub use currency::CurrencyTable;
pub use invoice::{Invoice, InvoiceStatus, InvoiceWithClient, NewInvoice};
pub use line_item::{LineItem, NewLineItem};
pub use user::User;
