//! Handlers for the `/orders` resource, including checkout.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use shoply_core::checkout::{validate_comment, validate_promo_code};
use shoply_core::error::CoreError;
use shoply_core::types::{DbId, Timestamp};
use shoply_db::models::order::{CreateOrderRequest, Order, OrderWithItems, UpdateOrder};
use shoply_db::repositories::{CheckoutService, OrderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /orders`.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    /// Admin-only filter: list another user's orders.
    pub user_id: Option<DbId>,
    pub date_start: Option<Timestamp>,
    pub date_end: Option<Timestamp>,
}

/// POST /api/v1/orders
///
/// Checkout: convert the caller's cart into an order atomically. Declines
/// with 422 when the cart is empty; the cart is left untouched on any
/// failure.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderWithItems>)> {
    let placed = CheckoutService::create_order(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(placed)))
}

/// GET /api/v1/orders/{id}
///
/// Owners see their own orders; admins see any.
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<OrderWithItems>> {
    let order = find_scoped(&state, &user, id).await?;
    let items = OrderRepo::list_items(&state.pool, order.id).await?;
    Ok(Json(OrderWithItems { order, items }))
}

/// GET /api/v1/orders
///
/// Without parameters: the caller's orders, newest first. Admins may pass
/// `?user_id=` or `?date_start=&date_end=` to widen the scope.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<ListOrdersParams>,
) -> AppResult<Json<Vec<Order>>> {
    if !user.is_admin() {
        if params.user_id.is_some_and(|id| id != user.user_id) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Cannot list another user's orders".into(),
            )));
        }
        let orders = OrderRepo::list_by_user(&state.pool, user.user_id).await?;
        return Ok(Json(orders));
    }

    let orders = match (params.user_id, params.date_start.zip(params.date_end)) {
        (Some(user_id), _) => OrderRepo::list_by_user(&state.pool, user_id).await?,
        (None, Some((start, end))) => {
            OrderRepo::list_by_date_range(&state.pool, start, end).await?
        }
        (None, None) => OrderRepo::list(&state.pool).await?,
    };
    Ok(Json(orders))
}

/// PATCH /api/v1/orders/{id}
///
/// Administrative correction of comment / promo code. Owner or admin.
/// Aggregates and line items are never touched.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrder>,
) -> AppResult<Json<Order>> {
    // Ownership check before any write.
    find_scoped(&state, &user, id).await?;

    if let Some(code) = &input.promo_code {
        validate_promo_code(code).map_err(AppError::Core)?;
    }
    if let Some(comment) = &input.comment {
        validate_comment(comment).map_err(AppError::Core)?;
    }

    let order = OrderRepo::update_partial(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        }))?;
    Ok(Json(order))
}

/// DELETE /api/v1/orders/{id} (admin)
///
/// Cascades to the order's line items.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = OrderRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Order",
            id,
        }))
    }
}

/// Fetch an order enforcing ownership for non-admin callers.
async fn find_scoped(state: &AppState, user: &AuthUser, id: DbId) -> AppResult<Order> {
    let order = if user.is_admin() {
        OrderRepo::find_by_id(&state.pool, id).await?
    } else {
        OrderRepo::find_by_user_and_id(&state.pool, user.user_id, id).await?
    };
    order.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Order",
        id,
    }))
}
