//! Shared helpers for store tests: an in-memory database plus seed data.

use migration::{Migrator, MigratorTrait};
use model::entities::user;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use crate::articles::{self, NewArticle};
use crate::users::{self, NewUser};
use crate::views::ArticleView;

pub(crate) async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");
    Migrator::up(&db, None).await.expect("Migrations failed");
    db
}

pub(crate) async fn seed_user(db: &DatabaseConnection, username: &str) -> user::Model {
    users::register(
        db,
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: format!("{username}-password"),
        },
    )
    .await
    .expect("Failed to seed user")
}

pub(crate) async fn seed_article(
    db: &DatabaseConnection,
    author_id: i32,
    title: &str,
    tags: &[&str],
) -> ArticleView {
    articles::create_article(
        db,
        author_id,
        NewArticle {
            title: title.to_string(),
            description: format!("About {title}"),
            body: format!("The full text of {title}."),
            tag_list: tags.iter().map(|tag| tag.to_string()).collect(),
        },
    )
    .await
    .expect("Failed to seed article")
}
