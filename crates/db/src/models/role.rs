use serde::Serialize;
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `roles` table. Seeded by migration; never created at runtime.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
