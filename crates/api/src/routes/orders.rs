//! Route definitions for the `/orders` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// POST   /        checkout (cart -> order)
/// GET    /        list own orders (admin: ?user_id= / date range)
/// GET    /{id}    get order with line items (owner or admin)
/// PATCH  /{id}    update comment / promo code (owner or admin)
/// DELETE /{id}    delete order (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route(
            "/{id}",
            get(orders::get_by_id)
                .patch(orders::update)
                .delete(orders::delete),
        )
}
