//! Repository for the `carts` and `cart_products` tables.
//!
//! A user has at most one cart (`uq_carts_user_id`); a product appears at
//! most once per cart (`uq_cart_products_cart_id_product_id`). Line items
//! carry a price snapshot taken when the row is first inserted, so later
//! catalog price changes never affect an existing cart.

use shoply_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart::{Cart, CartItem};

const CART_COLUMNS: &str = "id, user_id, created_at";
const ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, price_snapshot, created_at";

pub struct CartRepo;

impl CartRepo {
    /// Return the user's cart, creating an empty one if none exists.
    ///
    /// A foreign-key violation (unknown user) surfaces as a database error
    /// that the API layer classifies as not-found.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<Cart, sqlx::Error> {
        let insert = format!(
            "INSERT INTO carts (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO NOTHING
             RETURNING {CART_COLUMNS}"
        );
        if let Some(cart) = sqlx::query_as::<_, Cart>(&insert)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
        {
            tracing::debug!(user_id, cart_id = cart.id, "Created cart");
            return Ok(cart);
        }

        // ON CONFLICT DO NOTHING returned no row: the cart already exists.
        let select = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1");
        sqlx::query_as::<_, Cart>(&select)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find the user's cart without creating one.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Cart>, sqlx::Error> {
        let query = format!("SELECT {CART_COLUMNS} FROM carts WHERE user_id = $1");
        sqlx::query_as::<_, Cart>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Add a product to the user's cart or replace its quantity.
    ///
    /// Replace semantics: an existing line item's quantity is overwritten
    /// with `quantity`, never incremented. The price snapshot is read from
    /// `products.price` on first insert and left untouched on update.
    ///
    /// Returns `None` when the product does not exist.
    pub async fn upsert_item(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
        quantity: i32,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let cart = Self::get_or_create(pool, user_id).await?;

        let query = format!(
            "INSERT INTO cart_products (cart_id, product_id, quantity, price_snapshot)
             SELECT $1, p.id, $3, p.price FROM products p WHERE p.id = $2
             ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = EXCLUDED.quantity
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(cart.id)
            .bind(product_id)
            .bind(quantity)
            .fetch_optional(pool)
            .await
    }

    /// Remove a product from the user's cart.
    ///
    /// Idempotent: returns `None` when there is nothing to remove, which
    /// callers treat as success.
    pub async fn remove_item(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
    ) -> Result<Option<CartItem>, sqlx::Error> {
        let query = format!(
            "DELETE FROM cart_products cp
             USING carts c
             WHERE cp.cart_id = c.id AND c.user_id = $1 AND cp.product_id = $2
             RETURNING cp.{}",
            ITEM_COLUMNS.replace(", ", ", cp.")
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .bind(product_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete all line items from the user's cart. The cart row survives.
    ///
    /// Returns the number of line items removed.
    pub async fn clear(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM cart_products cp
             USING carts c
             WHERE cp.cart_id = c.id AND c.user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List the cart's line items, oldest first.
    pub async fn list_items(pool: &PgPool, user_id: DbId) -> Result<Vec<CartItem>, sqlx::Error> {
        let query = format!(
            "SELECT cp.{} FROM cart_products cp
             JOIN carts c ON c.id = cp.cart_id
             WHERE c.user_id = $1
             ORDER BY cp.id",
            ITEM_COLUMNS.replace(", ", ", cp.")
        );
        sqlx::query_as::<_, CartItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Sum of quantities across the user's cart line items.
    pub async fn count_items(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(cp.quantity), 0)::BIGINT
             FROM cart_products cp
             JOIN carts c ON c.id = cp.cart_id
             WHERE c.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Sum of quantity x price_snapshot across the user's cart line items.
    pub async fn total_price(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(cp.quantity::BIGINT * cp.price_snapshot), 0)::BIGINT
             FROM cart_products cp
             JOIN carts c ON c.id = cp.cart_id
             WHERE c.user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
