pub mod database;
pub mod metrics;
pub mod totals;

pub use database::Database;
pub use totals::{compute_totals, line_total, InvoiceTotals};
