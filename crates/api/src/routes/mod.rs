pub mod admin;
pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod posts;
pub mod products;
pub mod profile;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/refresh                    refresh (public)
/// /auth/logout                     logout (requires auth)
///
/// /admin/users                     list (admin only)
/// /admin/users/{id}                get, update, deactivate
///
/// /profile                         get, upsert (auth required)
///
/// /posts                           list, create
/// /posts/{id}                      get, update, delete
///
/// /products                        list, create (create admin only)
/// /products/{id}                   get, update, delete (admin only)
///
/// /cart                            snapshot, clear
/// /cart/items                      add / replace quantity
/// /cart/items/{product_id}         remove one item
///
/// /orders                          checkout (POST), list
/// /orders/{id}                     get, patch, delete (delete admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin/users", admin::users_router())
        .nest("/profile", profile::router())
        .nest("/posts", posts::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
}
