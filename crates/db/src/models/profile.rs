//! Profile entity model and DTOs. One profile per user.

use serde::{Deserialize, Serialize};
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating or replacing the caller's profile.
#[derive(Debug, Deserialize)]
pub struct UpsertProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
}
