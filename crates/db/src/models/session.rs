//! Refresh-token session model.

use serde::Serialize;
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `sessions` table. Stores only the SHA-256 hash of the
/// refresh token, never the plaintext.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for creating a session after login or refresh rotation.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
