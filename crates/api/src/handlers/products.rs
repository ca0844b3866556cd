//! Handlers for the `/products` resource (the product catalog).
//!
//! Reads are open to any authenticated user; mutation is admin-only.
//! Changing a price never touches existing cart or order snapshots.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shoply_core::error::CoreError;
use shoply_core::types::DbId;
use shoply_db::models::product::{CreateProduct, Product, UpdateProduct};
use shoply_db::repositories::ProductRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/products (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<Product>)> {
    if input.price < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    let product = ProductRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /api/v1/products
pub async fn list(State(state): State<AppState>, _user: AuthUser) -> AppResult<Json<Vec<Product>>> {
    let products = ProductRepo::list(&state.pool).await?;
    Ok(Json(products))
}

/// GET /api/v1/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Product>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(product))
}

/// PUT /api/v1/products/{id} (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<Product>> {
    if input.price.is_some_and(|p| p < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "Price must not be negative".into(),
        )));
    }
    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))?;
    Ok(Json(product))
}

/// DELETE /api/v1/products/{id} (admin)
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProductRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Product",
            id,
        }))
    }
}
