//! Handlers for the `/cart` resource.
//!
//! All routes operate on the authenticated user's cart; admins may act on
//! another user's cart via `?user_id=`. Add and replace share the same
//! replace-quantity semantics: the submitted quantity overwrites any
//! existing line item, it is never added to it.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shoply_core::checkout::{order_totals, LineItem, ZeroQuantityPolicy};
use shoply_core::error::CoreError;
use shoply_core::types::DbId;
use shoply_db::models::cart::{CartSnapshot, UpsertCartItem};
use shoply_db::repositories::CartRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::UserScopeParams;
use crate::state::AppState;

/// Resolve which user's cart the caller is allowed to touch.
///
/// `?user_id=` targeting another user requires the admin role.
fn target_user(auth: &AuthUser, scope: &UserScopeParams) -> Result<DbId, AppError> {
    match scope.user_id {
        Some(other) if other != auth.user_id => {
            if auth.is_admin() {
                Ok(other)
            } else {
                Err(AppError::Core(CoreError::Forbidden(
                    "Cannot access another user's cart".into(),
                )))
            }
        }
        _ => Ok(auth.user_id),
    }
}

async fn snapshot(state: &AppState, user_id: DbId) -> AppResult<CartSnapshot> {
    let cart = CartRepo::get_or_create(&state.pool, user_id).await?;
    let items = CartRepo::list_items(&state.pool, user_id).await?;

    // Aggregates come from the same read as `items`; separate SUM queries
    // could disagree with it under concurrent cart mutation.
    let line_items: Vec<LineItem> = items
        .iter()
        .map(|item| LineItem {
            quantity: item.quantity,
            price_snapshot: item.price_snapshot,
        })
        .collect();
    let totals = order_totals(&line_items).map_err(AppError::Core)?;

    Ok(CartSnapshot {
        cart,
        items,
        total_quantity: totals.total_quantity,
        total_price: totals.total_price,
    })
}

/// GET /api/v1/cart
///
/// Returns the cart with its line items and aggregates, creating an empty
/// cart on first access.
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Query(scope): Query<UserScopeParams>,
) -> AppResult<Json<CartSnapshot>> {
    let user_id = target_user(&user, &scope)?;
    Ok(Json(snapshot(&state, user_id).await?))
}

/// POST /api/v1/cart/items and PATCH /api/v1/cart/items
///
/// Add a product to the cart or replace its quantity. Quantity 0 is
/// handled per the configured [`ZeroQuantityPolicy`].
pub async fn upsert_item(
    State(state): State<AppState>,
    user: AuthUser,
    Query(scope): Query<UserScopeParams>,
    Json(input): Json<UpsertCartItem>,
) -> AppResult<Json<CartSnapshot>> {
    let user_id = target_user(&user, &scope)?;

    if input.quantity < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Quantity must not be negative".into(),
        )));
    }

    if input.quantity == 0 {
        match state.config.zero_quantity_policy {
            ZeroQuantityPolicy::Reject => {
                return Err(AppError::Core(CoreError::Validation(
                    "Quantity 0 is not allowed".into(),
                )));
            }
            ZeroQuantityPolicy::Delete => {
                CartRepo::remove_item(&state.pool, user_id, input.product_id).await?;
                return Ok(Json(snapshot(&state, user_id).await?));
            }
            ZeroQuantityPolicy::Keep => {}
        }
    }

    CartRepo::upsert_item(&state.pool, user_id, input.product_id, input.quantity)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id: input.product_id,
        }))?;

    Ok(Json(snapshot(&state, user_id).await?))
}

/// DELETE /api/v1/cart/items/{product_id}
///
/// Idempotent: removing an absent item is still a 204.
pub async fn remove_item(
    State(state): State<AppState>,
    user: AuthUser,
    Query(scope): Query<UserScopeParams>,
    Path(product_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let user_id = target_user(&user, &scope)?;
    let removed = CartRepo::remove_item(&state.pool, user_id, product_id).await?;
    if removed.is_none() {
        tracing::debug!(user_id, product_id, "Remove of absent cart item");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/cart
///
/// Empties the cart; the cart row itself survives.
pub async fn clear(
    State(state): State<AppState>,
    user: AuthUser,
    Query(scope): Query<UserScopeParams>,
) -> AppResult<StatusCode> {
    let user_id = target_user(&user, &scope)?;
    CartRepo::clear(&state.pool, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
