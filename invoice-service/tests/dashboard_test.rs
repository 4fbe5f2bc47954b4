//! Dashboard aggregation integration tests for invoice-service.

mod common;

use common::{decimal_field, invoice_payload, TestApp, TestUser};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use serial_test::serial;

/// Create an invoice with one 100-priced item in the given status.
async fn seed_invoice(app: &TestApp, user: &TestUser, client_id: &str, status: &str, due: &str) {
    let mut payload = invoice_payload(
        client_id,
        json!([{ "description": "Work", "quantity": 1, "price": 100 }]),
    );
    payload["status"] = json!(status);
    payload["due_date"] = json!(due);

    let response = app
        .post(user, "/invoices", &payload)
        .send()
        .await
        .expect("Failed to create invoice");
    assert_eq!(response.status(), 201);
}

#[tokio::test]
#[serial]
async fn dashboard_reflects_counts_revenue_and_overdue() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let client_id = app.create_client(&user, "Dash Client").await;

    // paid:2, pending:1, unpaid:1 past due.
    seed_invoice(&app, &user, &client_id, "paid", "2026-06-01").await;
    seed_invoice(&app, &user, &client_id, "paid", "2026-06-15").await;
    seed_invoice(&app, &user, &client_id, "pending", "2099-01-01").await;
    seed_invoice(&app, &user, &client_id, "unpaid", "2020-01-01").await;

    let dashboard: Value = app
        .get(&user, "/dashboard")
        .send()
        .await
        .expect("Failed to get dashboard")
        .json()
        .await
        .expect("Invalid dashboard body");

    assert_eq!(dashboard["total_invoices"], 4);
    assert_eq!(dashboard["overdue_invoices"], 1);
    assert_eq!(decimal_field(&dashboard["total_revenue"]), dec!(200));

    let counts = dashboard["status_counts"].as_array().unwrap();
    let count_for = |status: &str| {
        counts
            .iter()
            .find(|c| c["status"] == status)
            .map(|c| c["count"].as_i64().unwrap())
            .unwrap_or(0)
    };
    assert_eq!(count_for("paid"), 2);
    assert_eq!(count_for("pending"), 1);
    assert_eq!(count_for("unpaid"), 1);
}

#[tokio::test]
#[serial]
async fn dashboard_lists_five_most_recent_invoices() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let client_id = app.create_client(&user, "Recent Client").await;

    for _ in 0..6 {
        seed_invoice(&app, &user, &client_id, "pending", "2099-01-01").await;
    }

    let dashboard: Value = app
        .get(&user, "/dashboard")
        .send()
        .await
        .expect("Failed to get dashboard")
        .json()
        .await
        .expect("Invalid dashboard body");

    let recent = dashboard["recent_invoices"].as_array().unwrap();
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0]["client"], "Recent Client");
}

#[tokio::test]
#[serial]
async fn dashboard_monthly_revenue_groups_paid_invoices() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let client_id = app.create_client(&user, "Trend Client").await;

    // Both created now, so they land in the same calendar month bucket.
    seed_invoice(&app, &user, &client_id, "paid", "2026-06-01").await;
    seed_invoice(&app, &user, &client_id, "paid", "2026-07-01").await;
    seed_invoice(&app, &user, &client_id, "pending", "2099-01-01").await;

    let dashboard: Value = app
        .get(&user, "/dashboard")
        .send()
        .await
        .expect("Failed to get dashboard")
        .json()
        .await
        .expect("Invalid dashboard body");

    let monthly = dashboard["monthly_revenue"].as_array().unwrap();
    assert_eq!(monthly.len(), 1);
    assert_eq!(decimal_field(&monthly[0]["revenue"]), dec!(200));
}

#[tokio::test]
#[serial]
async fn dashboard_is_scoped_to_the_requesting_user() {
    let Some(app) = TestApp::spawn().await else { return };
    let busy = app.sign_in_new_user().await;
    let idle = app.sign_in_new_user().await;
    let client_id = app.create_client(&busy, "Busy Client").await;

    seed_invoice(&app, &busy, &client_id, "paid", "2026-06-01").await;

    let dashboard: Value = app
        .get(&idle, "/dashboard")
        .send()
        .await
        .expect("Failed to get dashboard")
        .json()
        .await
        .expect("Invalid dashboard body");

    assert_eq!(dashboard["total_invoices"], 0);
    assert_eq!(decimal_field(&dashboard["total_revenue"]), dec!(0));
    assert_eq!(dashboard["recent_invoices"].as_array().unwrap().len(), 0);
}
