//! Post entity model and DTOs.

use serde::{Deserialize, Serialize};
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a post. The author is taken from the auth token.
#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub body: String,
}

/// DTO for updating a post. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub body: Option<String>,
}
