//! Route definitions for the authenticated user's profile.

use axum::routing::get;
use axum::Router;

use crate::handlers::profile;
use crate::state::AppState;

/// Routes mounted at `/profile`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(profile::get).put(profile::upsert))
}
