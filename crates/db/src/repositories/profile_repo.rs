//! Repository for the `profiles` table.

use shoply_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpsertProfile};

const COLUMNS: &str = "id, user_id, first_name, last_name, bio, created_at, updated_at";

pub struct ProfileRepo;

impl ProfileRepo {
    /// Find the profile belonging to a user.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or replace the user's profile (`uq_profiles_user_id` upsert).
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (user_id, first_name, last_name, bio)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                bio = EXCLUDED.bio,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .fetch_one(pool)
            .await
    }
}
