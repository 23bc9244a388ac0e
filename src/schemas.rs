use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use store::token::AuthKeys;
use store::views::{ArticlePage, ArticleView, CommentView, ProfileView, UserView};
use utoipa::{OpenApi, ToSchema};

use crate::handlers::articles::{
    ArticlesQuery, CreateArticleRequest, FeedQuery, UpdateArticleRequest,
};
use crate::handlers::comments::CreateCommentRequest;
use crate::handlers::users::{LoginRequest, RegisterRequest, UpdateUserRequest};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Keys for signing and verifying authentication tokens
    pub keys: AuthKeys,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::register,
        crate::handlers::users::login,
        crate::handlers::users::get_current_user,
        crate::handlers::users::update_current_user,
        crate::handlers::profiles::get_profile,
        crate::handlers::profiles::follow_user,
        crate::handlers::profiles::unfollow_user,
        crate::handlers::articles::list_articles,
        crate::handlers::articles::feed_articles,
        crate::handlers::articles::get_article,
        crate::handlers::articles::create_article,
        crate::handlers::articles::update_article,
        crate::handlers::articles::delete_article,
        crate::handlers::articles::favorite_article,
        crate::handlers::articles::unfavorite_article,
        crate::handlers::comments::add_comment,
        crate::handlers::comments::list_comments,
        crate::handlers::comments::delete_comment,
        crate::handlers::tags::list_tags,
    ),
    components(
        schemas(
            ApiResponse<UserView>,
            ApiResponse<ProfileView>,
            ApiResponse<ArticleView>,
            ApiResponse<ArticlePage>,
            ApiResponse<CommentView>,
            ApiResponse<Vec<CommentView>>,
            ApiResponse<Vec<String>>,
            ApiResponse<String>,
            ErrorResponse,
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            UpdateUserRequest,
            CreateArticleRequest,
            UpdateArticleRequest,
            CreateCommentRequest,
            ArticlesQuery,
            FeedQuery,
            UserView,
            ProfileView,
            ArticleView,
            ArticlePage,
            CommentView,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Registration, login, and account settings"),
        (name = "profiles", description = "Public profiles and following"),
        (name = "articles", description = "Articles, listings, and favorites"),
        (name = "comments", description = "Comments on articles"),
        (name = "tags", description = "Tag directory"),
    ),
    info(
        title = "Conduit API",
        description = "A social publishing platform: articles, comments, favorites, and follows",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
