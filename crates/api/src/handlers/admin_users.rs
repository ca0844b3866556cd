//! Admin handlers for the `/admin/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shoply_core::error::CoreError;
use shoply_core::types::DbId;
use shoply_db::models::user::{UpdateUser, UserResponse};
use shoply_db::repositories::{RoleRepo, SessionRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/v1/admin/users
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = UserRepo::list(&state.pool).await?;
    let roles = RoleRepo::list(&state.pool).await?;

    let responses = users
        .into_iter()
        .map(|user| {
            let role = roles
                .iter()
                .find(|r| r.id == user.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_default();
            UserResponse::from_user(user, role)
        })
        .collect();
    Ok(Json(responses))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_by_id(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let role = RoleRepo::find_by_id(&state.pool, user.role_id)
        .await?
        .map(|r| r.name)
        .unwrap_or_default();
    Ok(Json(UserResponse::from_user(user, role)))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;
    let role = RoleRepo::find_by_id(&state.pool, user.role_id)
        .await?
        .map(|r| r.name)
        .unwrap_or_default();
    Ok(Json(UserResponse::from_user(user, role)))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Soft-deactivates the account and revokes its sessions.
pub async fn deactivate(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if !deactivated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::delete_for_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
