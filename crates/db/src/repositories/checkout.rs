//! The cart-to-order checkout transaction.
//!
//! This is the one place in the persistence layer that needs true
//! transactional discipline: compute aggregates from the cart's stored
//! price snapshots, persist the order header and its line items, and empty
//! the cart -- all-or-nothing. A partial failure (order without cleared
//! cart, or cleared cart without order) would corrupt user-visible state.

use shoply_core::checkout::{order_totals, validate_comment, validate_promo_code, LineItem};
use shoply_core::types::DbId;
use sqlx::PgPool;

use crate::models::cart::Cart;
use crate::models::order::{CreateOrderRequest, Order, OrderItem, OrderWithItems};

const ORDER_COLUMNS: &str =
    "id, user_id, total_price, total_quantity, comment, promo_code, created_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price_snapshot, created_at";

/// Errors produced by [`CheckoutService::create_order`].
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The cart has no line items with a positive quantity. A declined
    /// outcome, not a fault: nothing was written.
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid promo code: {0}")]
    InvalidPromoCode(String),

    #[error("Invalid comment: {0}")]
    InvalidComment(String),

    /// The cart's totals overflow 64-bit arithmetic. No writes were made.
    #[error("Order totals out of range: {0}")]
    TotalsOutOfRange(String),

    /// Storage-layer failure. The transaction is rolled back; a duplicate
    /// promo code surfaces here as a unique-constraint violation.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Atomic conversion of a cart into an order.
pub struct CheckoutService;

impl CheckoutService {
    /// Create an order from the user's cart and empty the cart.
    ///
    /// Runs as a single transaction:
    /// 1. Lock the cart row (`FOR UPDATE`) so concurrent checkouts on the
    ///    same cart serialize instead of double-charging.
    /// 2. Load line items; no positive-quantity rows means [`CheckoutError::EmptyCart`].
    /// 3. Compute totals from the stored snapshots -- never from the live
    ///    catalog, so price changes since "add to cart" don't leak in.
    /// 4. Insert the order header and copy each positive-quantity line item
    ///    verbatim (product, quantity, snapshot).
    /// 5. Delete the cart's line items. The cart row survives.
    ///
    /// Any failure rolls the whole call back, leaving the cart untouched.
    pub async fn create_order(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateOrderRequest,
    ) -> Result<OrderWithItems, CheckoutError> {
        if let Some(code) = &input.promo_code {
            validate_promo_code(code).map_err(|e| CheckoutError::InvalidPromoCode(e.to_string()))?;
        }
        if let Some(comment) = &input.comment {
            validate_comment(comment).map_err(|e| CheckoutError::InvalidComment(e.to_string()))?;
        }

        let mut tx = pool.begin().await?;

        // Row lock on the cart for the duration of the transaction.
        let cart: Option<Cart> = sqlx::query_as(
            "SELECT id, user_id, created_at FROM carts WHERE user_id = $1 FOR UPDATE",
        )
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(cart) = cart else {
            // No cart at all: nothing to check out. Dropping the
            // transaction rolls it back.
            return Err(CheckoutError::EmptyCart);
        };

        // Zero-quantity rows (permitted under the `keep` policy) are not
        // orderable content; an all-zero cart counts as empty.
        let items: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT quantity, price_snapshot FROM cart_products
             WHERE cart_id = $1 AND quantity > 0
             ORDER BY id",
        )
        .bind(cart.id)
        .fetch_all(&mut *tx)
        .await?;

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = order_totals(
            &items
                .iter()
                .map(|&(quantity, price_snapshot)| LineItem {
                    quantity,
                    price_snapshot,
                })
                .collect::<Vec<_>>(),
        )
        .map_err(|e| CheckoutError::TotalsOutOfRange(e.to_string()))?;

        let order_query = format!(
            "INSERT INTO orders (user_id, total_price, total_quantity, comment, promo_code)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ORDER_COLUMNS}"
        );
        let order: Order = sqlx::query_as(&order_query)
            .bind(user_id)
            .bind(totals.total_price)
            .bind(totals.total_quantity)
            .bind(&input.comment)
            .bind(&input.promo_code)
            .fetch_one(&mut *tx)
            .await?;

        // Copy the cart's line items verbatim into the order.
        let copy_query = format!(
            "INSERT INTO order_products (order_id, product_id, quantity, price_snapshot)
             SELECT $1, product_id, quantity, price_snapshot
             FROM cart_products
             WHERE cart_id = $2 AND quantity > 0
             RETURNING {ITEM_COLUMNS}"
        );
        let order_items: Vec<OrderItem> = sqlx::query_as(&copy_query)
            .bind(order.id)
            .bind(cart.id)
            .fetch_all(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM cart_products WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            order_id = order.id,
            total_price = order.total_price,
            total_quantity = order.total_quantity,
            "Checkout completed"
        );

        Ok(OrderWithItems {
            order,
            items: order_items,
        })
    }
}
