//! Route definitions for the `/products` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::products;
use crate::state::AppState;

/// Routes mounted at `/products`. Mutation is admin-only (enforced by the
/// handlers' `RequireAdmin` extractor).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get_by_id)
                .put(products::update)
                .delete(products::delete),
        )
}
