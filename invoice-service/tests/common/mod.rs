//! Shared test harness: spawns the real application against a test database
//! and drives it over HTTP.
//!
//! Tests are skipped (returning early) when `INVOICE_TEST_DATABASE_URL` is
//! not set, so the suite can run without a local Postgres.

use invoice_service::config::{
    Config, DashboardConfig, DatabaseConfig, InvoicingConfig, ServerConfig,
};
use invoice_service::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

/// A signed-in user, with the headers the frontend would attach.
pub struct TestUser {
    pub id: String,
    pub email: String,
}

impl TestApp {
    /// Spawn the application on a random port, or `None` when no test
    /// database is configured.
    pub async fn spawn() -> Option<TestApp> {
        let Ok(db_url) = std::env::var("INVOICE_TEST_DATABASE_URL") else {
            eprintln!("INVOICE_TEST_DATABASE_URL not set; skipping integration test");
            return None;
        };

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                max_connections: 5,
                min_connections: 1,
            },
            invoicing: InvoicingConfig {
                default_status: "pending".to_string(),
                default_currency: "USD".to_string(),
            },
            dashboard: DashboardConfig {
                overdue_statuses: vec!["pending".to_string(), "unpaid".to_string()],
            },
            service_name: "invoice-service".to_string(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let port = app.port();
        tokio::spawn(app.run_until_stopped());

        Some(TestApp {
            address: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::new(),
        })
    }

    /// Sign in a fresh user with a unique email, as the identity-provider
    /// callback would.
    pub async fn sign_in_new_user(&self) -> TestUser {
        let email = format!("user-{}@example.com", Uuid::new_v4());
        let response = self
            .client
            .post(format!("{}/session/sign-in", self.address))
            .json(&json!({ "email": email, "name": "Test User" }))
            .send()
            .await
            .expect("Failed to sign in");
        assert!(response.status().is_success());

        let body: Value = response.json().await.expect("Invalid sign-in body");
        TestUser {
            id: body["user"]["id"].as_str().expect("Missing user id").to_string(),
            email,
        }
    }

    pub fn get(&self, user: &TestUser, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.address, path))
            .header("X-User-ID", &user.id)
            .header("X-User-Email", &user.email)
    }

    pub fn post(&self, user: &TestUser, path: &str, body: &Value) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.address, path))
            .header("X-User-ID", &user.id)
            .header("X-User-Email", &user.email)
            .json(body)
    }

    pub fn put(&self, user: &TestUser, path: &str, body: &Value) -> reqwest::RequestBuilder {
        self.client
            .put(format!("{}{}", self.address, path))
            .header("X-User-ID", &user.id)
            .header("X-User-Email", &user.email)
            .json(body)
    }

    pub fn delete(&self, user: &TestUser, path: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(format!("{}{}", self.address, path))
            .header("X-User-ID", &user.id)
            .header("X-User-Email", &user.email)
    }

    /// Create a client and return its id.
    pub async fn create_client(&self, user: &TestUser, name: &str) -> String {
        let response = self
            .post(
                user,
                "/clients",
                &json!({ "name": name, "email": format!("{}@clients.example.com", Uuid::new_v4()) }),
            )
            .send()
            .await
            .expect("Failed to create client");
        assert_eq!(response.status(), 201);

        let body: Value = response.json().await.expect("Invalid client body");
        body["id"].as_str().expect("Missing client id").to_string()
    }
}

/// A well-formed invoice payload with the given items, overridable per test.
pub fn invoice_payload(client_id: &str, items: Value) -> Value {
    json!({
        "client_id": client_id,
        "invoice_number": format!("INV-{}", Uuid::new_v4()),
        "issue_date": "2026-01-10",
        "due_date": "2026-02-10",
        "items": items,
    })
}

/// Parse a money field that serializes as a decimal string.
pub fn decimal_field(value: &Value) -> rust_decimal::Decimal {
    value
        .as_str()
        .expect("Expected decimal string")
        .parse()
        .expect("Invalid decimal")
}
