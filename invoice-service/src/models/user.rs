//! User model for invoice-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Identity record keyed by email.
///
/// Created on first successful sign-in at the identity-provider boundary and
/// never mutated afterwards except for profile fields refreshed on sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
