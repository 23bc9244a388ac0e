use axum::{
    extract::{Path, State},
    response::Json,
};
use store::profiles;
use store::views::ProfileView;
use tracing::{info, instrument, trace};

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Get a user's public profile
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{username}",
    tag = "profiles",
    params(("username" = String, Path, description = "Profile username")),
    responses(
        (status = 200, description = "Profile found", body = ApiResponse<ProfileView>),
        (status = 404, description = "No such user", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_profile(
    MaybeAuthUser(viewer_id): MaybeAuthUser,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    trace!("Entering get_profile function for username: {}", username);

    let profile = profiles::get_profile(&state.db, viewer_id, &username).await?;
    Ok(Json(ApiResponse {
        data: profile,
        message: "Profile retrieved successfully".to_string(),
        success: true,
    }))
}

/// Follow a user
#[utoipa::path(
    post,
    path = "/api/v1/profiles/{username}/follow",
    tag = "profiles",
    params(("username" = String, Path, description = "Username to follow")),
    responses(
        (status = 200, description = "Now following", body = ApiResponse<ProfileView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such user", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Cannot follow yourself", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn follow_user(
    AuthUser(user_id): AuthUser,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    trace!("Entering follow_user function");

    let profile = profiles::follow(&state.db, user_id, &username).await?;
    info!("User {} followed {}", user_id, username);
    Ok(Json(ApiResponse {
        data: profile,
        message: "Profile followed successfully".to_string(),
        success: true,
    }))
}

/// Unfollow a user
#[utoipa::path(
    delete,
    path = "/api/v1/profiles/{username}/follow",
    tag = "profiles",
    params(("username" = String, Path, description = "Username to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = ApiResponse<ProfileView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such user", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn unfollow_user(
    AuthUser(user_id): AuthUser,
    Path(username): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ProfileView>>, ApiError> {
    trace!("Entering unfollow_user function");

    let profile = profiles::unfollow(&state.db, user_id, &username).await?;
    info!("User {} unfollowed {}", user_id, username);
    Ok(Json(ApiResponse {
        data: profile,
        message: "Profile unfollowed successfully".to_string(),
        success: true,
    }))
}
