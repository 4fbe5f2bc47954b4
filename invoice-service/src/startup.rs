//! Application startup and lifecycle management.

use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::middleware::metrics::metrics_middleware;
use crate::models::CurrencyTable;
use crate::services::{metrics, Database};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub currencies: CurrencyTable,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Binds the listener eagerly so tests can request port 0 and read the
    /// assigned port back before the server starts serving.
    pub async fn build(config: Config) -> Result<Self, AppError> {
        metrics::init_metrics();

        let db = Database::new(
            config.database.url.expose_secret(),
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;
        db.run_migrations().await?;

        let state = AppState {
            db,
            config: config.clone(),
            currencies: CurrencyTable::default(),
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(handlers::metrics))
            .route("/session/sign-in", post(handlers::session::sign_in))
            .route(
                "/clients",
                get(handlers::clients::list_clients).post(handlers::clients::create_client),
            )
            .route(
                "/clients/:id",
                get(handlers::clients::get_client)
                    .put(handlers::clients::update_client)
                    .delete(handlers::clients::delete_client),
            )
            .route(
                "/clients/:id/invoices",
                get(handlers::clients::list_client_invoices),
            )
            .route(
                "/invoices",
                get(handlers::invoices::list_invoices).post(handlers::invoices::create_invoice),
            )
            .route(
                "/invoices/:id",
                get(handlers::invoices::get_invoice)
                    .put(handlers::invoices::update_invoice)
                    .delete(handlers::invoices::delete_invoice),
            )
            .route("/dashboard", get(handlers::dashboard::get_dashboard))
            .layer(from_fn(metrics_middleware))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        user_id = tracing::field::Empty,
                    )
                }),
            )
            .with_state(state);

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(service = %config.service_name, port = port, "Listening");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}
