//! Request API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::{ApiResult, MessageResponse};
use crate::errors::AppError;
use crate::models::{ContactRequest, CreateRequestBody};
use crate::AppState;

/// GET /api/requests - List all requests, newest first.
pub async fn list_requests(State(state): State<AppState>) -> ApiResult<Json<Vec<ContactRequest>>> {
    tracing::info!("GET /api/requests");
    Ok(Json(state.repo.list_requests().await?))
}

/// POST /api/requests - Create a new request.
pub async fn create_request(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequestBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ContactRequest>)> {
    // A non-JSON body reads as an empty one, so the client still gets field details
    let body = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateRequestBody::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    tracing::info!("POST /api/requests from {:?}", body.user_max_link);

    let new = body.validate().map_err(|fields| {
        tracing::warn!("Missing required fields: {:?}", fields.missing());
        AppError::Validation {
            message: "All fields are required".to_string(),
            fields,
        }
    })?;

    let request = state.repo.create_request(&new).await?;
    tracing::info!("Request {} created for user {}", request.id, request.user_id);

    Ok((StatusCode::CREATED, Json(request)))
}

/// DELETE /api/requests/:id - Delete a request.
pub async fn delete_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    tracing::info!("DELETE /api/requests/{}", id);

    state.repo.delete_request(&id).await?;
    tracing::info!("Request {} deleted", id);

    Ok(Json(MessageResponse::new("Request deleted")))
}
