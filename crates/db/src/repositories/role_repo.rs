//! Repository for the `roles` table (read-only; rows are seeded).

use shoply_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

const COLUMNS: &str = "id, name, created_at";

pub struct RoleRepo;

impl RoleRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE id = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles WHERE name = $1");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY id");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }
}
