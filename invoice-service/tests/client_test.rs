//! Client CRUD integration tests for invoice-service.

mod common;

use common::{invoice_payload, TestApp};
use serde_json::{json, Value};

#[tokio::test]
async fn create_and_get_client_round_trip() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;

    let response = app
        .post(
            &user,
            "/clients",
            &json!({
                "name": "Acme Corp",
                "email": "billing@acme.example.com",
                "phone": "+1-555-0100",
                "company": "Acme",
                "address": "1 Acme Way",
            }),
        )
        .send()
        .await
        .expect("Failed to create client");
    assert_eq!(response.status(), 201);

    let created: Value = response.json().await.expect("Invalid client body");
    let client_id = created["id"].as_str().unwrap();

    let fetched: Value = app
        .get(&user, &format!("/clients/{}", client_id))
        .send()
        .await
        .expect("Failed to get client")
        .json()
        .await
        .expect("Invalid client body");

    assert_eq!(fetched["name"], "Acme Corp");
    assert_eq!(fetched["email"], "billing@acme.example.com");
    assert_eq!(fetched["company"], "Acme");
}

#[tokio::test]
async fn client_without_email_is_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;

    let response = app
        .post(&user, "/clients", &json!({ "name": "No Email", "email": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn update_client_overwrites_fields() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let client_id = app.create_client(&user, "Before").await;

    let response = app
        .put(
            &user,
            &format!("/clients/{}", client_id),
            &json!({ "name": "After", "email": "after@example.com", "phone": "123" }),
        )
        .send()
        .await
        .expect("Failed to update client");
    assert_eq!(response.status(), 200);

    let updated: Value = response.json().await.expect("Invalid client body");
    assert_eq!(updated["name"], "After");
    assert_eq!(updated["phone"], "123");
    // Fields omitted from the payload are cleared, not kept.
    assert!(updated["company"].is_null());
}

#[tokio::test]
async fn clients_are_isolated_between_users() {
    let Some(app) = TestApp::spawn().await else { return };
    let owner = app.sign_in_new_user().await;
    let intruder = app.sign_in_new_user().await;
    let client_id = app.create_client(&owner, "Private Client").await;

    let response = app
        .get(&intruder, &format!("/clients/{}", client_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);

    let listed: Value = app
        .get(&intruder, "/clients")
        .send()
        .await
        .expect("Failed to list clients")
        .json()
        .await
        .expect("Invalid list body");
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn delete_client_without_invoices_succeeds() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let client_id = app.create_client(&user, "Ephemeral").await;

    let response = app
        .delete(&user, &format!("/clients/{}", client_id))
        .send()
        .await
        .expect("Failed to delete client");
    assert_eq!(response.status(), 200);

    let response = app
        .get(&user, &format!("/clients/{}", client_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn delete_client_with_invoices_is_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let client_id = app.create_client(&user, "Invoiced").await;

    let payload = invoice_payload(
        &client_id,
        json!([{ "description": "Design", "quantity": 1, "price": 10 }]),
    );
    let response = app
        .post(&user, "/invoices", &payload)
        .send()
        .await
        .expect("Failed to create invoice");
    assert_eq!(response.status(), 201);

    let response = app
        .delete(&user, &format!("/clients/{}", client_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    // The client is still there.
    let response = app
        .get(&user, &format!("/clients/{}", client_id))
        .send()
        .await
        .expect("Failed to get client");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn list_client_invoices_is_scoped_to_that_client() {
    let Some(app) = TestApp::spawn().await else { return };
    let user = app.sign_in_new_user().await;
    let billed = app.create_client(&user, "Billed").await;
    let other = app.create_client(&user, "Quiet").await;

    let payload = invoice_payload(
        &billed,
        json!([{ "description": "Design", "quantity": 1, "price": 10 }]),
    );
    let response = app
        .post(&user, "/invoices", &payload)
        .send()
        .await
        .expect("Failed to create invoice");
    assert_eq!(response.status(), 201);

    let billed_invoices: Value = app
        .get(&user, &format!("/clients/{}/invoices", billed))
        .send()
        .await
        .expect("Failed to list invoices")
        .json()
        .await
        .expect("Invalid list body");
    assert_eq!(billed_invoices.as_array().unwrap().len(), 1);

    let other_invoices: Value = app
        .get(&user, &format!("/clients/{}/invoices", other))
        .send()
        .await
        .expect("Failed to list invoices")
        .json()
        .await
        .expect("Invalid list body");
    assert_eq!(other_invoices.as_array().unwrap().len(), 0);
}
