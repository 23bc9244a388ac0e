use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use store::articles::{self, ArticlePatch, NewArticle};
use store::feed::{self, ArticleFilters};
use store::views::{ArticlePage, ArticleView};
use store::Page;
use tracing::{debug, info, instrument, trace};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{AuthUser, MaybeAuthUser};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState};

/// Query parameters for the global article list
#[derive(Debug, Deserialize, ToSchema)]
pub struct ArticlesQuery {
    /// Only articles carrying this tag
    pub tag: Option<String>,
    /// Only articles by this author
    pub author: Option<String>,
    /// Only articles favorited by this user
    pub favorited: Option<String>,
    /// Page size (default 20)
    pub limit: Option<i64>,
    /// Number of articles to skip
    pub offset: Option<i64>,
}

/// Query parameters for the personalized feed
#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedQuery {
    /// Page size (default 20)
    pub limit: Option<i64>,
    /// Number of articles to skip
    pub offset: Option<i64>,
}

/// Request body for publishing an article
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

/// Request body for updating an article; omitted fields are unchanged
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

/// List articles, newest first, with optional filters
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    tag = "articles",
    responses(
        (status = 200, description = "Articles retrieved successfully", body = ApiResponse<ArticlePage>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_articles(
    MaybeAuthUser(viewer_id): MaybeAuthUser,
    Query(query): Query<ArticlesQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ArticlePage>>, ApiError> {
    trace!("Entering list_articles function");

    let filters = ArticleFilters {
        tag: query.tag,
        author: query.author,
        favorited: query.favorited,
    };
    let page = feed::list_articles(
        &state.db,
        viewer_id,
        &filters,
        Page::clamped(query.limit, query.offset),
    )
    .await?;

    debug!("Listed {} of {} articles", page.articles.len(), page.articles_count);
    Ok(Json(ApiResponse {
        data: page,
        message: "Articles retrieved successfully".to_string(),
        success: true,
    }))
}

/// List articles from followed authors, newest first
#[utoipa::path(
    get,
    path = "/api/v1/articles/feed",
    tag = "articles",
    responses(
        (status = 200, description = "Feed retrieved successfully", body = ApiResponse<ArticlePage>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn feed_articles(
    AuthUser(user_id): AuthUser,
    Query(query): Query<FeedQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ArticlePage>>, ApiError> {
    trace!("Entering feed_articles function for user_id: {}", user_id);

    let page =
        feed::list_feed(&state.db, user_id, Page::clamped(query.limit, query.offset)).await?;
    Ok(Json(ApiResponse {
        data: page,
        message: "Feed retrieved successfully".to_string(),
        success: true,
    }))
}

/// Get a single article by slug
#[utoipa::path(
    get,
    path = "/api/v1/articles/{slug}",
    tag = "articles",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article found", body = ApiResponse<ArticleView>),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_article(
    MaybeAuthUser(viewer_id): MaybeAuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ArticleView>>, ApiError> {
    trace!("Entering get_article function for slug: {}", slug);

    let article = articles::get_article(&state.db, viewer_id, &slug).await?;
    Ok(Json(ApiResponse {
        data: article,
        message: "Article retrieved successfully".to_string(),
        success: true,
    }))
}

/// Publish a new article
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    tag = "articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article created successfully", body = ApiResponse<ArticleView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid article data", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_article(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ArticleView>>), ApiError> {
    trace!("Entering create_article function for user_id: {}", user_id);
    request.validate()?;

    let article = articles::create_article(
        &state.db,
        user_id,
        NewArticle {
            title: request.title,
            description: request.description,
            body: request.body,
            tag_list: request.tag_list,
        },
    )
    .await?;

    info!("Article '{}' created by user {}", article.slug, user_id);
    let response = ApiResponse {
        data: article,
        message: "Article created successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update an article (author only)
#[utoipa::path(
    put,
    path = "/api/v1/articles/{slug}",
    tag = "articles",
    params(("slug" = String, Path, description = "Article slug")),
    request_body = UpdateArticleRequest,
    responses(
        (status = 200, description = "Article updated successfully", body = ApiResponse<ArticleView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Not the article's author", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 422, description = "Invalid article data", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_article(
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<ApiResponse<ArticleView>>, ApiError> {
    trace!("Entering update_article function for slug: {}", slug);
    request.validate()?;

    let article = articles::update_article(
        &state.db,
        user_id,
        &slug,
        ArticlePatch {
            title: request.title,
            description: request.description,
            body: request.body,
            tag_list: request.tag_list,
        },
    )
    .await?;

    info!("Article '{}' updated by user {}", article.slug, user_id);
    Ok(Json(ApiResponse {
        data: article,
        message: "Article updated successfully".to_string(),
        success: true,
    }))
}

/// Delete an article (author only)
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{slug}",
    tag = "articles",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 403, description = "Not the article's author", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_article(
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_article function for slug: {}", slug);

    articles::delete_article(&state.db, user_id, &slug).await?;

    info!("Article '{}' deleted by user {}", slug, user_id);
    Ok(Json(ApiResponse {
        data: format!("Article '{slug}' deleted"),
        message: "Article deleted successfully".to_string(),
        success: true,
    }))
}

/// Favorite an article
#[utoipa::path(
    post,
    path = "/api/v1/articles/{slug}/favorite",
    tag = "articles",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article favorited", body = ApiResponse<ArticleView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn favorite_article(
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ArticleView>>, ApiError> {
    trace!("Entering favorite_article function for slug: {}", slug);

    let article = articles::favorite(&state.db, user_id, &slug).await?;
    Ok(Json(ApiResponse {
        data: article,
        message: "Article favorited successfully".to_string(),
        success: true,
    }))
}

/// Remove a favorite
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{slug}/favorite",
    tag = "articles",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Favorite removed", body = ApiResponse<ArticleView>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse),
        (status = 404, description = "No such article", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn unfavorite_article(
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ArticleView>>, ApiError> {
    trace!("Entering unfavorite_article function for slug: {}", slug);

    let article = articles::unfavorite(&state.db, user_id, &slug).await?;
    Ok(Json(ApiResponse {
        data: article,
        message: "Article unfavorited successfully".to_string(),
        success: true,
    }))
}
