//! Dashboard aggregation handler.
//!
//! Pure reads, every query scoped to the session user. Each aggregate is an
//! independent snapshot; no cross-query atomicity is required.

use axum::{extract::State, Json};
use service_core::error::AppError;

use crate::dtos::DashboardResponse;
use crate::middleware::SessionUser;
use crate::startup::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    user: SessionUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let overdue_statuses = &state.config.dashboard.overdue_statuses;

    let (total_invoices, total_revenue, status_counts, overdue_invoices, recent, monthly) = tokio::try_join!(
        state.db.count_invoices(user.user_id),
        state.db.total_revenue(user.user_id),
        state.db.status_counts(user.user_id),
        state.db.overdue_count(user.user_id, overdue_statuses),
        state.db.recent_invoices(user.user_id),
        state.db.monthly_revenue(user.user_id),
    )?;

    Ok(Json(DashboardResponse {
        total_invoices,
        total_revenue,
        status_counts,
        overdue_invoices,
        recent_invoices: recent,
        monthly_revenue: monthly,
    }))
}
