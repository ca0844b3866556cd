//! Route definitions for the `/cart` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::cart;
use crate::state::AppState;

/// Routes mounted at `/cart`.
///
/// ```text
/// GET    /                      cart snapshot (creates empty cart lazily)
/// DELETE /                      clear all line items
/// POST   /items                 add / replace quantity
/// PATCH  /items                 replace quantity (same semantics)
/// DELETE /items/{product_id}    remove one item (idempotent)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::get).delete(cart::clear))
        .route("/items", post(cart::upsert_item).patch(cart::upsert_item))
        .route("/items/{product_id}", delete(cart::remove_item))
}
