//! This file serves as the root for all SeaORM entity modules.
//! The data model of the publishing service lives here: users, the articles
//! they author, tags, comments, and the three many-to-many edge tables
//! (follows, favorites, article_tags).

pub mod article;
pub mod article_tag;
pub mod comment;
pub mod favorite;
pub mod follow;
pub mod tag;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::article::Entity as Article;
    pub use super::article_tag::Entity as ArticleTag;
    pub use super::comment::Entity as Comment;
    pub use super::favorite::Entity as Favorite;
    pub use super::follow::Entity as Follow;
    pub use super::tag::Entity as Tag;
    pub use super::user::Entity as User;
}
