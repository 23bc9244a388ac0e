use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use store::comments;
use store::views::CommentView;
use tracing::{info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for adding a comment
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1))]
    pub body: String,
}

/// Add a comment to an article
#[utoipa::path(
    post,
    path = "/api/v1/articles/{slug}/comments",
    tag = "comments",
    params(("slug" = String, Path, description = "Article slug")),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added successfully", body = ApiResponse<CommentView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Empty comment body", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn add_comment(
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentView>>), ApiError> {
    trace!("Entering add_comment function for slug: {}", slug);
    request.validate()?;

    let comment = comments::add_comment(&state.db, user_id, &slug, &request.body).await?;

    info!("Comment {} added to '{}' by user {}", comment.id, slug, user_id);
    let response = ApiResponse {
        data: comment,
        message: "Comment added successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// List an article's comments, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/articles/{slug}/comments",
    tag = "comments",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Comments retrieved successfully", body = ApiResponse<Vec<CommentView>>),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_comments(
    MaybeAuthUser(viewer_id): MaybeAuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CommentView>>>, ApiError> {
    trace!("Entering list_comments function for slug: {}", slug);

    let comments = comments::list_comments(&state.db, viewer_id, &slug).await?;
    Ok(Json(ApiResponse {
        data: comments,
        message: "Comments retrieved successfully".to_string(),
        success: true,
    }))
}

/// Delete a comment (comment author only)
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{slug}/comments/{comment_id}",
    tag = "comments",
    params(
        ("slug" = String, Path, description = "Article slug"),
        ("comment_id" = i32, Path, description = "Comment id")
    ),
    responses(
        (status = 200, description = "Comment deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Not the comment's author", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such article or comment", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_comment(
    AuthUser(user_id): AuthUser,
    Path((slug, comment_id)): Path<(String, i32)>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_comment function for comment_id: {}", comment_id);

    comments::delete_comment(&state.db, user_id, &slug, comment_id).await?;

    info!("Comment {} deleted by user {}", comment_id, user_id);
    Ok(Json(ApiResponse {
        data: format!("Comment {comment_id} deleted"),
        message: "Comment deleted successfully".to_string(),
        success: true,
    }))
}
