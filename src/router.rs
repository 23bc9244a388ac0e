use crate::handlers::{
    articles::{
        create_article, delete_article, favorite_article, feed_articles, get_article,
        list_articles, unfavorite_article, update_article,
    },
    comments::{add_comment, delete_comment, list_comments},
    health::health_check,
    profiles::{follow_user, get_profile, unfollow_user},
    tags::list_tags,
    users::{get_current_user, login, register, update_current_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Account routes
        .route("/api/v1/users", post(register))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/user", get(get_current_user))
        .route("/api/v1/user", put(update_current_user))
        // Profile routes
        .route("/api/v1/profiles/:username", get(get_profile))
        .route("/api/v1/profiles/:username/follow", post(follow_user))
        .route("/api/v1/profiles/:username/follow", delete(unfollow_user))
        // Article routes
        .route("/api/v1/articles", get(list_articles))
        .route("/api/v1/articles", post(create_article))
        .route("/api/v1/articles/feed", get(feed_articles))
        .route("/api/v1/articles/:slug", get(get_article))
        .route("/api/v1/articles/:slug", put(update_article))
        .route("/api/v1/articles/:slug", delete(delete_article))
        .route("/api/v1/articles/:slug/favorite", post(favorite_article))
        .route("/api/v1/articles/:slug/favorite", delete(unfavorite_article))
        // Comment routes
        .route("/api/v1/articles/:slug/comments", post(add_comment))
        .route("/api/v1/articles/:slug/comments", get(list_comments))
        .route(
            "/api/v1/articles/:slug/comments/:comment_id",
            delete(delete_comment),
        )
        // Tag directory
        .route("/api/v1/tags", get(list_tags))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
