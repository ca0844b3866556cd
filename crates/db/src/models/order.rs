//! Order and order line-item models.

use serde::{Deserialize, Serialize};
use shoply_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Row from the `orders` table.
///
/// Totals are frozen at checkout; the only mutable fields afterwards are
/// `comment` and `promo_code` (administrative correction).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub total_price: i64,
    pub total_quantity: i64,
    pub comment: Option<String>,
    pub promo_code: Option<String>,
    pub created_at: Timestamp,
}

/// Row from the `order_products` table. Immutable copy of a cart line item
/// made at checkout time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: DbId,
    pub quantity: i32,
    pub price_snapshot: i64,
    pub created_at: Timestamp,
}

/// Request body for checkout (`POST /orders`). The cart contents come from
/// the caller's persisted cart, not the request.
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub comment: Option<String>,
    pub promo_code: Option<String>,
}

/// DTO for the administrative partial update of an order.
///
/// Aggregates are deliberately absent: they are never recomputed.
#[derive(Debug, Deserialize)]
pub struct UpdateOrder {
    pub comment: Option<String>,
    pub promo_code: Option<String>,
}

/// An order header together with its line items.
#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}
