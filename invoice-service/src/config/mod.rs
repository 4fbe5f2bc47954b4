use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::Secret;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub invoicing: InvoicingConfig,
    pub dashboard: DashboardConfig,
    pub service_name: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Invoicing defaults applied when the caller omits optional fields.
#[derive(Clone, Debug)]
pub struct InvoicingConfig {
    pub default_status: String,
    pub default_currency: String,
}

#[derive(Clone, Debug)]
pub struct DashboardConfig {
    /// Non-terminal statuses that count as overdue once past the due date.
    pub overdue_statuses: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("INVOICE_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("INVOICE_SERVICE_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse()
            .context("INVOICE_SERVICE_PORT must be a port number")?;

        let db_url =
            env::var("INVOICE_DATABASE_URL").context("INVOICE_DATABASE_URL must be set")?;
        let max_connections = env::var("INVOICE_DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("INVOICE_DATABASE_MAX_CONNECTIONS must be a number")?;
        let min_connections = env::var("INVOICE_DATABASE_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .context("INVOICE_DATABASE_MIN_CONNECTIONS must be a number")?;

        let default_status =
            env::var("INVOICE_DEFAULT_STATUS").unwrap_or_else(|_| "pending".to_string());
        let default_currency =
            env::var("INVOICE_DEFAULT_CURRENCY").unwrap_or_else(|_| "USD".to_string());

        let overdue_statuses = env::var("INVOICE_OVERDUE_STATUSES")
            .unwrap_or_else(|_| "pending,unpaid".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            server: ServerConfig { host, port },
            database: DatabaseConfig {
                url: Secret::new(db_url),
                max_connections,
                min_connections,
            },
            invoicing: InvoicingConfig {
                default_status,
                default_currency,
            },
            dashboard: DashboardConfig { overdue_statuses },
            service_name: "invoice-service".to_string(),
        })
    }
}
