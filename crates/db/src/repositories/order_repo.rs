//! Repository for the `orders` and `order_products` tables.
//!
//! Orders are created only by [`super::CheckoutService`]; this repository
//! covers retrieval, the administrative partial update, and deletion.

use shoply_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::order::{Order, OrderItem, UpdateOrder};

const COLUMNS: &str = "id, user_id, total_price, total_quantity, comment, promo_code, created_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price_snapshot, created_at";

pub struct OrderRepo;

impl OrderRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Ownership-scoped read: the order must belong to `user_id`.
    ///
    /// Used for non-admin callers so one user cannot read another's orders.
    pub async fn find_by_user_and_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All orders for a user, newest first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Order>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Orders created within `[start, end]` (inclusive), newest first.
    pub async fn list_by_date_range(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE created_at >= $1 AND created_at <= $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// All orders, newest first (admin listing).
    pub async fn list(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC");
        sqlx::query_as::<_, Order>(&query).fetch_all(pool).await
    }

    /// Administrative correction of `comment` / `promo_code` only.
    ///
    /// Aggregates are never recomputed; the order's line items and totals
    /// stay frozen as of checkout.
    pub async fn update_partial(
        pool: &PgPool,
        id: DbId,
        input: &UpdateOrder,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                comment = COALESCE($2, comment),
                promo_code = COALESCE($3, promo_code)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(&input.comment)
            .bind(&input.promo_code)
            .fetch_optional(pool)
            .await
    }

    /// Delete an order. Cascades to its line items.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Line items for an order, in insertion order.
    pub async fn list_items(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_products WHERE order_id = $1 ORDER BY id");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }
}
