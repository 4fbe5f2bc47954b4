//! Database service for invoice-service.
//!
//! All reads and writes of client or invoice data are scoped to the owning
//! user in SQL; there is no code path that touches another user's rows.
//! Multi-statement writes (invoice create, item replacement) run inside a
//! single transaction so a failure mid-sequence never leaves an invoice whose
//! header totals disagree with its item set.

use crate::models::{
    Client, ClientFields, Invoice, InvoiceWithClient, LineItem, NewInvoice, NewLineItem, User,
};
use crate::services::metrics::DB_QUERY_DURATION;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// A recent invoice joined with its client name, for the dashboard.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct RecentInvoice {
    pub id: Uuid,
    pub client: String,
    pub total: Decimal,
    pub currency: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Invoice count for one status value.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Paid revenue for one calendar month.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct MonthlyRevenue {
    pub month: NaiveDate,
    pub revenue: Decimal,
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // User Operations
    // -------------------------------------------------------------------------

    /// Upsert a user keyed by email, refreshing profile fields on sign-in.
    #[instrument(skip(self, name, image_url), fields(email = %email))]
    pub async fn upsert_user(
        &self,
        email: &str,
        name: Option<&str>,
        image_url: Option<&str>,
    ) -> Result<User, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_user"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, image_url)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE
            SET name = COALESCE(EXCLUDED.name, users.name),
                image_url = COALESCE(EXCLUDED.image_url, users.image_url)
            RETURNING id, name, email, image_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to upsert user: {}", e)))?;

        timer.observe_duration();

        info!(user_id = %user.id, "User signed in");

        Ok(user)
    }

    // -------------------------------------------------------------------------
    // Client Operations
    // -------------------------------------------------------------------------

    /// Create a new client owned by the given user.
    #[instrument(skip(self, fields), fields(user_id = %user_id))]
    pub async fn create_client(
        &self,
        user_id: Uuid,
        fields: &ClientFields,
    ) -> Result<Client, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_client"])
            .start_timer();

        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, user_id, name, email, phone, company, address)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, name, email, phone, company, address, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.company)
        .bind(&fields.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create client: {}", e)))?;

        timer.observe_duration();

        info!(client_id = %client.id, "Client created");

        Ok(client)
    }

    /// Get a client by ID, scoped to its owner.
    #[instrument(skip(self), fields(user_id = %user_id, client_id = %client_id))]
    pub async fn get_client(
        &self,
        user_id: Uuid,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_client"])
            .start_timer();

        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, name, email, phone, company, address, created_at
            FROM clients
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get client: {}", e)))?;

        timer.observe_duration();

        Ok(client)
    }

    /// List all clients for a user, newest first.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_clients(&self, user_id: Uuid) -> Result<Vec<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_clients"])
            .start_timer();

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, name, email, phone, company, address, created_at
            FROM clients
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list clients: {}", e)))?;

        timer.observe_duration();

        Ok(clients)
    }

    /// Full update of a client's writable fields, scoped to its owner.
    #[instrument(skip(self, fields), fields(user_id = %user_id, client_id = %client_id))]
    pub async fn update_client(
        &self,
        user_id: Uuid,
        client_id: Uuid,
        fields: &ClientFields,
    ) -> Result<Option<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_client"])
            .start_timer();

        let client = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET name = $3, email = $4, phone = $5, company = $6, address = $7
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, email, phone, company, address, created_at
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.company)
        .bind(&fields.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update client: {}", e)))?;

        timer.observe_duration();

        if let Some(ref c) = client {
            info!(client_id = %c.id, "Client updated");
        }

        Ok(client)
    }

    /// Delete a client, scoped to its owner.
    ///
    /// Deletion is rejected with a conflict while invoices still reference the
    /// client, so an invoice can never point at a missing client row.
    #[instrument(skip(self), fields(user_id = %user_id, client_id = %client_id))]
    pub async fn delete_client(&self, user_id: Uuid, client_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_client"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM invoices WHERE client_id = $1 AND user_id = $2
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count client invoices: {}", e))
        })?;

        if invoice_count > 0 {
            tx.rollback().await.ok();
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Client has {} invoice(s); delete them first",
                invoice_count
            )));
        }

        let result = sqlx::query(
            r#"
            DELETE FROM clients WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete client: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(client_id = %client_id, "Client deleted");
        }

        Ok(deleted)
    }

    /// Whether a client exists and belongs to the given user.
    #[instrument(skip(self), fields(user_id = %user_id, client_id = %client_id))]
    pub async fn client_owned(&self, user_id: Uuid, client_id: Uuid) -> Result<bool, AppError> {
        let owned: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1 AND user_id = $2)
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check client ownership: {}", e))
        })?;

        Ok(owned)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// Persist an invoice header plus its line items in one transaction.
    #[instrument(skip(self, header, items), fields(user_id = %header.user_id))]
    pub async fn create_invoice(
        &self,
        header: &NewInvoice,
        items: &[NewLineItem],
    ) -> Result<(Invoice, Vec<LineItem>), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice_id = Uuid::new_v4();
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                id, user_id, client_id, invoice_number, issue_date, due_date,
                currency, currency_symbol, subtotal, tax, discount, total, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, user_id, client_id, invoice_number, issue_date, due_date,
                currency, currency_symbol, subtotal, tax, discount, total, notes, status,
                created_at, updated_at
            "#,
        )
        .bind(invoice_id)
        .bind(header.user_id)
        .bind(header.client_id)
        .bind(&header.invoice_number)
        .bind(header.issue_date)
        .bind(header.due_date)
        .bind(&header.currency)
        .bind(&header.currency_symbol)
        .bind(header.subtotal)
        .bind(header.tax)
        .bind(header.discount)
        .bind(header.total)
        .bind(&header.notes)
        .bind(&header.status)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)))?;

        let line_items = Self::insert_items(&mut tx, invoice_id, items).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total,
            "Invoice created"
        );

        Ok((invoice, line_items))
    }

    /// Get an invoice with its client summary and ordered items, scoped to its owner.
    #[instrument(skip(self), fields(user_id = %user_id, invoice_id = %invoice_id))]
    pub async fn get_invoice(
        &self,
        user_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<(InvoiceWithClient, Vec<LineItem>)>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice"])
            .start_timer();

        let invoice = sqlx::query_as::<_, InvoiceWithClient>(
            r#"
            SELECT i.id, i.user_id, i.client_id, i.invoice_number, i.issue_date, i.due_date,
                i.currency, i.currency_symbol, i.subtotal, i.tax, i.discount, i.total,
                i.notes, i.status, i.created_at, i.updated_at,
                c.name AS client_name, c.email AS client_email
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE i.id = $1 AND i.user_id = $2
            "#,
        )
        .bind(invoice_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))?;

        let result = match invoice {
            Some(invoice) => {
                let items = self.get_invoice_items(invoice_id).await?;
                Some((invoice, items))
            }
            None => None,
        };

        timer.observe_duration();

        Ok(result)
    }

    /// List a user's invoices with client names and item sets, newest first.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_invoices(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<(InvoiceWithClient, Vec<LineItem>)>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, InvoiceWithClient>(
            r#"
            SELECT i.id, i.user_id, i.client_id, i.invoice_number, i.issue_date, i.due_date,
                i.currency, i.currency_symbol, i.subtotal, i.tax, i.discount, i.total,
                i.notes, i.status, i.created_at, i.updated_at,
                c.name AS client_name, c.email AS client_email
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE i.user_id = $1
            ORDER BY i.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        let ids: Vec<Uuid> = invoices.iter().map(|i| i.invoice.id).collect();
        let all_items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT id, invoice_id, description, quantity, price, total
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list invoice items: {}", e))
        })?;

        let result = invoices
            .into_iter()
            .map(|invoice| {
                let items = all_items
                    .iter()
                    .filter(|item| item.invoice_id == invoice.invoice.id)
                    .cloned()
                    .collect();
                (invoice, items)
            })
            .collect();

        timer.observe_duration();

        Ok(result)
    }

    /// List invoices referencing one client, scoped to the owning user.
    #[instrument(skip(self), fields(user_id = %user_id, client_id = %client_id))]
    pub async fn list_client_invoices(
        &self,
        user_id: Uuid,
        client_id: Uuid,
    ) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_client_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, user_id, client_id, invoice_number, issue_date, due_date,
                currency, currency_symbol, subtotal, tax, discount, total,
                notes, status, created_at, updated_at
            FROM invoices
            WHERE client_id = $1 AND user_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list client invoices: {}", e))
        })?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Update an invoice header and replace its entire item set, atomically.
    ///
    /// Returns `None` when the invoice does not exist or is not owned by
    /// `header.user_id`; nothing is written in that case.
    #[instrument(skip(self, header, items), fields(user_id = %header.user_id, invoice_id = %invoice_id))]
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        header: &NewInvoice,
        items: &[NewLineItem],
    ) -> Result<Option<(Invoice, Vec<LineItem>)>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_invoice"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET client_id = $3,
                invoice_number = $4,
                issue_date = $5,
                due_date = $6,
                currency = $7,
                currency_symbol = $8,
                subtotal = $9,
                tax = $10,
                discount = $11,
                total = $12,
                notes = $13,
                status = $14,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, client_id, invoice_number, issue_date, due_date,
                currency, currency_symbol, subtotal, tax, discount, total, notes, status,
                created_at, updated_at
            "#,
        )
        .bind(invoice_id)
        .bind(header.user_id)
        .bind(header.client_id)
        .bind(&header.invoice_number)
        .bind(header.issue_date)
        .bind(header.due_date)
        .bind(&header.currency)
        .bind(&header.currency_symbol)
        .bind(header.subtotal)
        .bind(header.tax)
        .bind(header.discount)
        .bind(header.total)
        .bind(&header.notes)
        .bind(&header.status)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update invoice: {}", e)))?;

        let Some(invoice) = invoice else {
            tx.rollback().await.ok();
            timer.observe_duration();
            return Ok(None);
        };

        // Full replace: delete-all-then-insert, no diffing of unchanged items.
        sqlx::query(
            r#"
            DELETE FROM invoice_items WHERE invoice_id = $1
            "#,
        )
        .bind(invoice_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice items: {}", e))
        })?;

        let line_items = Self::insert_items(&mut tx, invoice_id, items).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(invoice_id = %invoice.id, total = %invoice.total, "Invoice updated");

        Ok(Some((invoice, line_items)))
    }

    /// Delete an invoice, scoped to its owner. Items go with it.
    #[instrument(skip(self), fields(user_id = %user_id, invoice_id = %invoice_id))]
    pub async fn delete_invoice(&self, user_id: Uuid, invoice_id: Uuid) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_invoice"])
            .start_timer();

        let result = sqlx::query(
            r#"
            DELETE FROM invoices WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(invoice_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete invoice: {}", e)))?;

        timer.observe_duration();

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(invoice_id = %invoice_id, "Invoice deleted");
        }

        Ok(deleted)
    }

    /// Get the ordered item set for one invoice.
    async fn get_invoice_items(&self, invoice_id: Uuid) -> Result<Vec<LineItem>, AppError> {
        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT id, invoice_id, description, quantity, price, total
            FROM invoice_items
            WHERE invoice_id = $1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice items: {}", e))
        })?;

        Ok(items)
    }

    async fn insert_items(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        invoice_id: Uuid,
        items: &[NewLineItem],
    ) -> Result<Vec<LineItem>, AppError> {
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let line_item = sqlx::query_as::<_, LineItem>(
                r#"
                INSERT INTO invoice_items (id, invoice_id, description, quantity, price, total)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, invoice_id, description, quantity, price, total
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(invoice_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.total)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert line item: {}", e))
            })?;
            inserted.push(line_item);
        }
        Ok(inserted)
    }

    // -------------------------------------------------------------------------
    // Dashboard Aggregates
    // -------------------------------------------------------------------------

    /// Total invoice count for a user.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn count_invoices(&self, user_id: Uuid) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_invoices"])
            .start_timer();

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM invoices WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count invoices: {}", e)))?;

        timer.observe_duration();

        Ok(count)
    }

    /// Sum of `total` over paid invoices. Amounts are summed without currency
    /// conversion; normalization is the consuming dashboard's concern.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn total_revenue(&self, user_id: Uuid) -> Result<Decimal, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["total_revenue"])
            .start_timer();

        let revenue: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total), 0)
            FROM invoices
            WHERE user_id = $1 AND status = 'paid'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to sum paid revenue: {}", e))
        })?;

        timer.observe_duration();

        Ok(revenue)
    }

    /// Invoice counts grouped by status.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn status_counts(&self, user_id: Uuid) -> Result<Vec<StatusCount>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["status_counts"])
            .start_timer();

        let counts = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM invoices
            WHERE user_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count by status: {}", e))
        })?;

        timer.observe_duration();

        Ok(counts)
    }

    /// Invoices in a non-terminal status whose due date has passed.
    ///
    /// The status set signalling "still collectible" is configuration, not a
    /// hardcoded literal.
    #[instrument(skip(self, overdue_statuses), fields(user_id = %user_id))]
    pub async fn overdue_count(
        &self,
        user_id: Uuid,
        overdue_statuses: &[String],
    ) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["overdue_count"])
            .start_timer();

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM invoices
            WHERE user_id = $1
              AND status = ANY($2)
              AND due_date < CURRENT_DATE
            "#,
        )
        .bind(user_id)
        .bind(overdue_statuses)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count overdue invoices: {}", e))
        })?;

        timer.observe_duration();

        Ok(count)
    }

    /// The five most recently created invoices, with client name joined in.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn recent_invoices(&self, user_id: Uuid) -> Result<Vec<RecentInvoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["recent_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, RecentInvoice>(
            r#"
            SELECT i.id, c.name AS client, i.total, i.currency, i.status, i.created_at
            FROM invoices i
            JOIN clients c ON c.id = i.client_id
            WHERE i.user_id = $1
            ORDER BY i.created_at DESC
            LIMIT 5
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list recent invoices: {}", e))
        })?;

        timer.observe_duration();

        Ok(invoices)
    }

    /// Paid revenue grouped by calendar month of creation, ascending.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn monthly_revenue(&self, user_id: Uuid) -> Result<Vec<MonthlyRevenue>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["monthly_revenue"])
            .start_timer();

        let rows = sqlx::query_as::<_, MonthlyRevenue>(
            r#"
            SELECT date_trunc('month', created_at)::date AS month,
                   SUM(total) AS revenue
            FROM invoices
            WHERE user_id = $1 AND status = 'paid'
            GROUP BY date_trunc('month', created_at)
            ORDER BY month
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to group monthly revenue: {}", e))
        })?;

        timer.observe_duration();

        Ok(rows)
    }
}
