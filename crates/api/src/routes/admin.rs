//! Route definitions for admin-only resources.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin_users;
use crate::state::AppState;

/// Routes mounted at `/admin/users`. All require the admin role.
pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_users::list))
        .route(
            "/{id}",
            get(admin_users::get_by_id)
                .put(admin_users::update)
                .delete(admin_users::deactivate),
        )
}
