//! Cart and cart line-item models.

use serde::{Deserialize, Serialize};
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `carts` table. At most one per user (`uq_carts_user_id`).
///
/// The row itself survives checkout and explicit clearing; only line items
/// come and go.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cart {
    pub id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// Row from the `cart_products` table.
///
/// `price_snapshot` is the product price captured when the row was first
/// inserted; later product price changes never touch it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CartItem {
    pub id: DbId,
    pub cart_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub price_snapshot: i64,
    pub created_at: Timestamp,
}

/// DTO for adding or replacing a cart line item.
///
/// Replace semantics: the given quantity overwrites any existing quantity
/// for (cart, product); it is never added to it.
#[derive(Debug, Deserialize)]
pub struct UpsertCartItem {
    pub product_id: DbId,
    pub quantity: i32,
}

/// Cart snapshot returned by the cart endpoints: the cart row, its line
/// items, and the aggregates over them.
#[derive(Debug, Serialize)]
pub struct CartSnapshot {
    pub cart: Cart,
    pub items: Vec<CartItem>,
    pub total_quantity: i64,
    pub total_price: i64,
}
