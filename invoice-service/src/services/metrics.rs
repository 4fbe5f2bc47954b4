//! Prometheus metrics for invoice-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// HTTP request counter by method, path and status.
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register http_requests_total")
});

/// HTTP request duration histogram by method and path.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register http_request_duration")
});

/// Invoice counter by status.
pub static INVOICES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_invoices_total",
        "Total number of invoices created by status",
        &["status"] // draft, pending, paid, unpaid, overdue, cancelled
    )
    .expect("Failed to register invoices_total")
});

/// Monetary amount counter by currency.
pub static INVOICE_AMOUNT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoice_invoice_amount_total",
        "Total invoiced amount by currency",
        &["currency"]
    )
    .expect("Failed to register invoice_amount_total")
});

/// Database query duration histogram.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_db_query_duration_seconds",
        "Database query duration in seconds",
        &["operation"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .expect("Failed to register db_query_duration")
});

/// Force registration of all metrics at startup.
pub fn init_metrics() {
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION);
    Lazy::force(&INVOICES_TOTAL);
    Lazy::force(&INVOICE_AMOUNT_TOTAL);
    Lazy::force(&DB_QUERY_DURATION);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
