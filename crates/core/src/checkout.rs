//! Pure checkout arithmetic and input validation.
//!
//! The transactional checkout flow lives in `shoply-db`; this module holds
//! the framework-free pieces: order totals computed from cart line-item
//! snapshots, promo-code and comment shape validation, and the policy for
//! zero-quantity cart rows.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Required promo code length in characters.
pub const PROMO_CODE_LEN: usize = 10;

/// Minimum order comment length in characters.
pub const COMMENT_MIN_LEN: usize = 3;

/// Maximum order comment length in characters.
pub const COMMENT_MAX_LEN: usize = 200;

/// A (quantity, price_snapshot) pair as stored on a cart line item.
///
/// Prices are integers in minor currency units; quantities are never
/// negative (enforced by a database CHECK constraint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub quantity: i32,
    pub price_snapshot: i64,
}

/// Aggregates derived from a cart's line items at checkout time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderTotals {
    pub total_price: i64,
    pub total_quantity: i64,
}

/// Compute order totals from cart line-item snapshots.
///
/// Uses the price snapshot stored on each line item, never a live catalog
/// price, so price changes between "add to cart" and checkout cannot alter
/// the order. Zero-quantity rows contribute nothing. The schema permits
/// prices up to `i64::MAX`, so the arithmetic is checked; overflow is a
/// validation error rather than a panic or wrap.
pub fn order_totals(items: &[LineItem]) -> Result<OrderTotals, CoreError> {
    items.iter().try_fold(OrderTotals::default(), |acc, item| {
        let qty = i64::from(item.quantity);
        let line_total = qty
            .checked_mul(item.price_snapshot)
            .ok_or_else(totals_overflow)?;
        Ok(OrderTotals {
            total_price: acc
                .total_price
                .checked_add(line_total)
                .ok_or_else(totals_overflow)?,
            total_quantity: acc
                .total_quantity
                .checked_add(qty)
                .ok_or_else(totals_overflow)?,
        })
    })
}

fn totals_overflow() -> CoreError {
    CoreError::Validation("Order totals exceed the representable range".to_string())
}

/// Validate a promo code: exactly [`PROMO_CODE_LEN`] characters.
///
/// Uniqueness is the database's job (`uq_orders_promo_code`); this only
/// checks the shape.
pub fn validate_promo_code(code: &str) -> Result<(), CoreError> {
    if code.chars().count() != PROMO_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "Promo code must be exactly {PROMO_CODE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate an order comment: [`COMMENT_MIN_LEN`]..=[`COMMENT_MAX_LEN`] characters.
pub fn validate_comment(comment: &str) -> Result<(), CoreError> {
    let len = comment.chars().count();
    if !(COMMENT_MIN_LEN..=COMMENT_MAX_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Comment must be between {COMMENT_MIN_LEN} and {COMMENT_MAX_LEN} characters"
        )));
    }
    Ok(())
}

/// What to do when a cart line item is written with quantity 0.
///
/// The schema permits zero-quantity rows; whether they should exist is a
/// deployment decision, so it is configurable (`CART_ZERO_QUANTITY_POLICY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ZeroQuantityPolicy {
    /// Persist the row with quantity 0. Checkout skips it.
    #[default]
    Keep,
    /// Treat quantity 0 as item removal.
    Delete,
    /// Reject the request with a validation error.
    Reject,
}

impl FromStr for ZeroQuantityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "delete" => Ok(Self::Delete),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "Unknown zero-quantity policy '{other}' (expected keep, delete, or reject)"
            )),
        }
    }
}
