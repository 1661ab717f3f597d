//! User API endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::models::User;
use crate::AppState;

/// GET /api/users - List all users.
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    tracing::info!("GET /api/users");
    Ok(Json(state.repo.list_users().await?))
}
