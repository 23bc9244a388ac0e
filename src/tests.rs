#[cfg(test)]
mod integration_tests {
    use crate::schemas::ApiResponse;
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::header::AUTHORIZATION;
    use axum::http::{HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn token_header(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Token {token}")).unwrap()
    }

    /// Register a user and return their token.
    async fn register_user(server: &TestServer, username: &str) -> String {
        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": format!("{username}-password"),
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert!(body.success);
        body.data["token"].as_str().unwrap().to_string()
    }

    /// Create an article and return its slug.
    async fn create_article(server: &TestServer, token: &str, title: &str, tags: &[&str]) -> String {
        let response = server
            .post("/api/v1/articles")
            .add_header(AUTHORIZATION, token_header(token))
            .json(&json!({
                "title": title,
                "description": format!("About {title}"),
                "body": format!("The full text of {title}."),
                "tagList": tags,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["slug"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Register
        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "username": "jake",
                "email": "jake@jake.jake",
                "password": "jakejake",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["username"], "jake");
        assert_eq!(body.data["email"], "jake@jake.jake");
        assert!(!body.data["token"].as_str().unwrap().is_empty());
        // The password hash is never exposed
        assert!(body.data.get("password").is_none());
        assert!(body.data.get("passwordHash").is_none());

        // Login with the same credentials
        let response = server
            .post("/api/v1/users/login")
            .json(&json!({
                "email": "jake@jake.jake",
                "password": "jakejake",
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["username"], "jake");

        // Wrong password is a 401
        let response = server
            .post("/api/v1/users/login")
            .json(&json!({
                "email": "jake@jake.jake",
                "password": "wrong-password",
            }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "AUTHENTICATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        // Malformed email
        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "username": "jake",
                "email": "not-an-email",
                "password": "jakejake",
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        // Short password
        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "username": "jake",
                "email": "jake@jake.jake",
                "password": "short",
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        // Duplicate username
        register_user(&server, "amy").await;
        let response = server
            .post("/api/v1/users")
            .json(&json!({
                "username": "amy",
                "email": "other@example.com",
                "password": "password-123",
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = response.json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_current_user_requires_token() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let token = register_user(&server, "jake").await;

        // No token
        let response = server.get("/api/v1/user").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Garbage token
        let response = server
            .get("/api/v1/user")
            .add_header(AUTHORIZATION, token_header("garbage.token.here"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Valid token, both supported schemes
        let response = server
            .get("/api/v1/user")
            .add_header(AUTHORIZATION, token_header(&token))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["username"], "jake");

        let response = server
            .get("/api/v1/user")
            .add_header(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
            )
            .await;
        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_settings() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let token = register_user(&server, "jake").await;

        let response = server
            .put("/api/v1/user")
            .add_header(AUTHORIZATION, token_header(&token))
            .json(&json!({
                "bio": "I like to skateboard",
                "image": "https://i.stack.imgur.com/xHWG8.jpg",
            }))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["bio"], "I like to skateboard");

        // The new bio shows up on the public profile
        let response = server.get("/api/v1/profiles/jake").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["bio"], "I like to skateboard");
        assert_eq!(body.data["following"], false);
    }

    #[tokio::test]
    async fn test_follow_and_unfollow_profile() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;

        // Following requires a token
        let response = server.post("/api/v1/profiles/jake/follow").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Follow
        let response = server
            .post("/api/v1/profiles/jake/follow")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["following"], true);

        // The flag is viewer-dependent
        let response = server
            .get("/api/v1/profiles/jake")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["following"], true);

        let response = server.get("/api/v1/profiles/jake").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["following"], false);

        // Self-follow is rejected
        let response = server
            .post("/api/v1/profiles/amy/follow")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        // Unknown profile is a 404
        let response = server
            .post("/api/v1/profiles/nobody/follow")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        // Unfollow
        let response = server
            .delete("/api/v1/profiles/jake/follow")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["following"], false);
    }

    #[tokio::test]
    async fn test_article_lifecycle() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;

        let slug = create_article(
            &server,
            &jake_token,
            "How to Train Your Dragon",
            &["dragons", "training"],
        )
        .await;
        assert_eq!(slug, "how-to-train-your-dragon");

        // Anyone can read it
        let response = server.get("/api/v1/articles/how-to-train-your-dragon").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["title"], "How to Train Your Dragon");
        assert_eq!(body.data["author"]["username"], "jake");
        assert_eq!(body.data["tagList"], json!(["dragons", "training"]));

        // A non-author cannot update it
        let response = server
            .put("/api/v1/articles/how-to-train-your-dragon")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .json(&json!({"body": "hijacked"}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        // The author can; the slug survives the rename
        let response = server
            .put("/api/v1/articles/how-to-train-your-dragon")
            .add_header(AUTHORIZATION, token_header(&jake_token))
            .json(&json!({"title": "Did You Train It Though", "tagList": ["memoir"]}))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["slug"], "how-to-train-your-dragon");
        assert_eq!(body.data["title"], "Did You Train It Though");
        assert_eq!(body.data["tagList"], json!(["memoir"]));

        // A non-author cannot delete it
        let response = server
            .delete("/api/v1/articles/how-to-train-your-dragon")
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        // The author deletes it
        let response = server
            .delete("/api/v1/articles/how-to-train-your-dragon")
            .add_header(AUTHORIZATION, token_header(&jake_token))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get("/api/v1/articles/how-to-train-your-dragon").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_titles_get_distinct_slugs() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;

        let first = create_article(&server, &jake_token, "Same Title", &[]).await;
        let second = create_article(&server, &amy_token, "Same Title", &[]).await;
        assert_eq!(first, "same-title");
        assert_eq!(second, "same-title-2");

        // Each slug resolves to its own author's article
        let response = server.get("/api/v1/articles/same-title-2").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["author"]["username"], "amy");
    }

    #[tokio::test]
    async fn test_favorites() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;

        let slug = create_article(&server, &jake_token, "Popular Post", &[]).await;

        // amy favorites it
        let response = server
            .post(&format!("/api/v1/articles/{slug}/favorite"))
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["favorited"], true);
        assert_eq!(body.data["favoritesCount"], 1);

        // Favoriting again does not bump the count
        let response = server
            .post(&format!("/api/v1/articles/{slug}/favorite"))
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["favoritesCount"], 1);

        // jake sees the count but is not marked as having favorited
        let response = server
            .get(&format!("/api/v1/articles/{slug}"))
            .add_header(AUTHORIZATION, token_header(&jake_token))
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["favorited"], false);
        assert_eq!(body.data["favoritesCount"], 1);

        // The favorited filter finds it
        let response = server.get("/api/v1/articles?favorited=amy").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 1);
        assert_eq!(body.data["articles"][0]["slug"], slug);

        // Unfavorite
        let response = server
            .delete(&format!("/api/v1/articles/{slug}/favorite"))
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["favorited"], false);
        assert_eq!(body.data["favoritesCount"], 0);
    }

    #[tokio::test]
    async fn test_article_listing_and_filters() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;

        create_article(&server, &jake_token, "Dragons One", &["dragons"]).await;
        create_article(&server, &jake_token, "Dragons Two", &["dragons"]).await;
        create_article(&server, &amy_token, "Paperwork", &["precinct"]).await;

        // Global list, newest first
        let response = server.get("/api/v1/articles").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 3);
        assert_eq!(body.data["articles"][0]["slug"], "paperwork");

        // Tag filter
        let response = server.get("/api/v1/articles?tag=dragons").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 2);

        // Author filter
        let response = server.get("/api/v1/articles?author=amy").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 1);

        // Unknown author matches nothing
        let response = server.get("/api/v1/articles?author=nobody").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 0);

        // limit=0 still reports the total
        let response = server.get("/api/v1/articles?limit=0").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 3);
        assert_eq!(body.data["articles"].as_array().unwrap().len(), 0);

        // Pagination
        let response = server.get("/api/v1/articles?limit=1&offset=1").await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 3);
        assert_eq!(body.data["articles"][0]["slug"], "dragons-two");
    }

    #[tokio::test]
    async fn test_feed() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;
        let rosa_token = register_user(&server, "rosa").await;

        create_article(&server, &jake_token, "From Jake", &[]).await;
        create_article(&server, &amy_token, "From Amy", &[]).await;

        // The feed requires a token
        let response = server.get("/api/v1/articles/feed").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // An empty follow graph yields an empty feed
        let response = server
            .get("/api/v1/articles/feed")
            .add_header(AUTHORIZATION, token_header(&rosa_token))
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 0);

        // rosa follows jake; the feed now has exactly jake's article
        let response = server
            .post("/api/v1/profiles/jake/follow")
            .add_header(AUTHORIZATION, token_header(&rosa_token))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .get("/api/v1/articles/feed")
            .add_header(AUTHORIZATION, token_header(&rosa_token))
            .await;
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["articlesCount"], 1);
        assert_eq!(body.data["articles"][0]["author"]["username"], "jake");
        assert_eq!(body.data["articles"][0]["author"]["following"], true);
    }

    #[tokio::test]
    async fn test_comments() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;
        let amy_token = register_user(&server, "amy").await;

        let slug = create_article(&server, &jake_token, "Discussed", &[]).await;

        // Commenting requires a token
        let response = server
            .post(&format!("/api/v1/articles/{slug}/comments"))
            .json(&json!({"body": "anonymous"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        // Empty body is rejected
        let response = server
            .post(&format!("/api/v1/articles/{slug}/comments"))
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .json(&json!({"body": ""}))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        // Add two comments
        let response = server
            .post(&format!("/api/v1/articles/{slug}/comments"))
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .json(&json!({"body": "First thought"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        let comment_id = body.data["id"].as_i64().unwrap();
        assert_eq!(body.data["author"]["username"], "amy");

        let response = server
            .post(&format!("/api/v1/articles/{slug}/comments"))
            .add_header(AUTHORIZATION, token_header(&jake_token))
            .json(&json!({"body": "Author replies"}))
            .await;
        response.assert_status(StatusCode::CREATED);

        // Listing is public, oldest first
        let response = server.get(&format!("/api/v1/articles/{slug}/comments")).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 2);
        assert_eq!(body.data[0]["body"], "First thought");
        assert_eq!(body.data[1]["body"], "Author replies");

        // Only the comment's author may delete it
        let response = server
            .delete(&format!("/api/v1/articles/{slug}/comments/{comment_id}"))
            .add_header(AUTHORIZATION, token_header(&jake_token))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);

        let response = server
            .delete(&format!("/api/v1/articles/{slug}/comments/{comment_id}"))
            .add_header(AUTHORIZATION, token_header(&amy_token))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server.get(&format!("/api/v1/articles/{slug}/comments")).await;
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
    }

    #[tokio::test]
    async fn test_tags_directory() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let jake_token = register_user(&server, "jake").await;

        // Empty before any articles exist
        let response = server.get("/api/v1/tags").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<Vec<String>> = response.json();
        assert!(body.data.is_empty());

        create_article(&server, &jake_token, "One", &["zebra", "apple"]).await;
        create_article(&server, &jake_token, "Two", &["apple"]).await;

        // Sorted and deduplicated
        let response = server.get("/api/v1/tags").await;
        let body: ApiResponse<Vec<String>> = response.json();
        assert_eq!(body.data, vec!["apple".to_string(), "zebra".to_string()]);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status(StatusCode::OK);
        let document: Value = response.json();
        assert!(document["paths"]["/api/v1/articles"].is_object());
        assert!(document["paths"]["/api/v1/users/login"].is_object());
    }
}
