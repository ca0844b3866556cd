//! Handlers for the authenticated user's profile.

use axum::extract::State;
use axum::Json;
use shoply_core::error::CoreError;
use shoply_db::models::profile::{Profile, UpsertProfile};
use shoply_db::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Profile>> {
    let profile = ProfileRepo::find_by_user_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.user_id,
        }))?;
    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Creates the profile on first write, replaces it afterwards.
pub async fn upsert(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UpsertProfile>,
) -> AppResult<Json<Profile>> {
    let profile = ProfileRepo::upsert(&state.pool, user.user_id, &input).await?;
    Ok(Json(profile))
}
