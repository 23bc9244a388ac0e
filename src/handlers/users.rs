use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use store::users::{self, NewUser, SettingsPatch};
use store::views::UserView;
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Request body for registering a new account
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Password (at least 8 characters)
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for updating account settings; omitted fields are unchanged
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<UserView>),
        (status = 422, description = "Invalid or duplicate registration data", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    trace!("Entering register function");
    request.validate()?;
    debug!("Registering user with username: {}", request.username);

    let user = users::register(
        &state.db,
        NewUser {
            username: request.username,
            email: request.email,
            password: request.password,
        },
    )
    .await?;
    let token = state.keys.issue(user.id)?;

    info!("User registered successfully with ID: {}", user.id);
    let response = ApiResponse {
        data: users::user_view(&user, token),
        message: "User registered successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange email/password credentials for a token
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<UserView>),
        (status = 401, description = "Invalid credentials", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    trace!("Entering login function");

    let user = users::authenticate(&state.db, &request.email, &request.password).await?;
    let token = state.keys.issue(user.id)?;

    info!("User {} logged in", user.id);
    Ok(Json(ApiResponse {
        data: users::user_view(&user, token),
        message: "Login successful".to_string(),
        success: true,
    }))
}

/// Get the authenticated user's account
#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "users",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<UserView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_current_user(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    trace!("Entering get_current_user function for user_id: {}", user_id);

    let user = users::find_by_id(&state.db, user_id).await?;
    let token = state.keys.issue(user.id)?;

    Ok(Json(ApiResponse {
        data: users::user_view(&user, token),
        message: "User retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update the authenticated user's account settings
#[utoipa::path(
    put,
    path = "/api/v1/user",
    tag = "users",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<UserView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid or duplicate settings", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_current_user(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    trace!("Entering update_current_user function for user_id: {}", user_id);
    request.validate()?;

    let user = users::update_settings(
        &state.db,
        user_id,
        SettingsPatch {
            email: request.email,
            username: request.username,
            password: request.password,
            bio: request.bio,
            image: request.image,
        },
    )
    .await?;
    let token = state.keys.issue(user.id)?;

    info!("User {} updated their settings", user.id);
    Ok(Json(ApiResponse {
        data: users::user_view(&user, token),
        message: "User updated successfully".to_string(),
        success: true,
    }))
}
