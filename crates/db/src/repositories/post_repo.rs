//! Repository for the `posts` table.

use shoply_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post, UpdatePost};

const COLUMNS: &str = "id, user_id, title, body, created_at, updated_at";

pub struct PostRepo;

impl PostRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreatePost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (user_id, title, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts ORDER BY created_at DESC");
        sqlx::query_as::<_, Post>(&query).fetch_all(pool).await
    }

    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Post>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM posts WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List posts created within `[start, end]`, newest first.
    pub async fn list_by_date_range(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts
             WHERE created_at >= $1 AND created_at <= $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Update a post. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                body = COALESCE($3, body),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.body)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
