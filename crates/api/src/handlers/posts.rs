//! Handlers for the `/posts` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use shoply_core::error::CoreError;
use shoply_core::types::DbId;
use shoply_db::models::post::{CreatePost, Post, UpdatePost};
use shoply_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DateRangeParams;
use crate::state::AppState;

/// POST /api/v1/posts
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = PostRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts
///
/// Optional `?date_start=&date_end=` filters by creation time (inclusive).
pub async fn list(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(range): Query<DateRangeParams>,
) -> AppResult<Json<Vec<Post>>> {
    let posts = match range.range() {
        Some((start, end)) => PostRepo::list_by_date_range(&state.pool, start, end).await?,
        None => PostRepo::list(&state.pool).await?,
    };
    Ok(Json(posts))
}

/// GET /api/v1/posts/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Post>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(post))
}

/// PUT /api/v1/posts/{id}
///
/// Authors may edit their own posts; admins may edit any.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<Post>> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    if post.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot modify another user's post".into(),
        )));
    }

    let updated = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    Ok(Json(updated))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let post = PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Post", id }))?;
    if post.user_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot delete another user's post".into(),
        )));
    }

    PostRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
