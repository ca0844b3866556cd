//! Product catalog model and DTOs.

use serde::{Deserialize, Serialize};
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `products` table. `price` is in minor currency units.
///
/// Price changes never propagate to existing cart or order line items;
/// those carry their own `price_snapshot`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub created_at: Timestamp,
}

/// DTO for creating a product (admin only).
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
}

/// DTO for updating a product (admin only). All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
}
