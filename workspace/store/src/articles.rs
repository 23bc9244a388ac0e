//! Article lifecycle: create, read, update, delete, favorite.
//!
//! Articles are addressed by slug everywhere. Mutations check ownership
//! before touching anything; favoriting is open to any authenticated user.

use chrono::Utc;
use model::entities::{article, article_tag, comment, favorite, prelude::*};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::debug;

use crate::views::ArticleView;
use crate::{feed, slug, tags, Result, StoreError};

/// Input for publishing a new article.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
}

/// A partial article update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(StoreError::Validation("title must not be empty".to_string()));
    }
    if title.len() > 255 {
        return Err(StoreError::Validation(
            "title must be at most 255 characters".to_string(),
        ));
    }
    Ok(())
}

/// Look up an article row by its slug.
pub async fn find_by_slug<C: ConnectionTrait>(db: &C, slug: &str) -> Result<article::Model> {
    Article::find()
        .filter(article::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or(StoreError::NotFound("article"))
}

/// Look up an article and verify the caller authored it.
async fn find_owned<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    slug: &str,
) -> Result<article::Model> {
    let article = find_by_slug(db, slug).await?;
    if article.author_id != user_id {
        return Err(StoreError::Authorization(
            "only the author may modify this article".to_string(),
        ));
    }
    Ok(article)
}

/// Publish a new article under the given author.
pub async fn create_article<C: ConnectionTrait>(
    db: &C,
    author_id: i32,
    new: NewArticle,
) -> Result<ArticleView> {
    let title = new.title.trim().to_string();
    validate_title(&title)?;

    let slug = slug::unique_for_title(db, &title).await?;
    let now = Utc::now();
    let article = article::ActiveModel {
        slug: Set(slug),
        title: Set(title),
        description: Set(new.description.trim().to_string()),
        body: Set(new.body),
        author_id: Set(author_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tags::set_article_tags(db, article.id, &new.tag_list).await?;
    debug!("Created article '{}' (id {})", article.slug, article.id);

    view_for(db, Some(author_id), article).await
}

/// Fetch one article by slug, decorated for the viewer.
pub async fn get_article<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    slug: &str,
) -> Result<ArticleView> {
    let article = find_by_slug(db, slug).await?;
    view_for(db, viewer_id, article).await
}

/// Update an article's title, description, body, or tag set.
///
/// Only the author may update. The slug is never regenerated, even when the
/// title changes; published links keep resolving.
pub async fn update_article<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    slug: &str,
    patch: ArticlePatch,
) -> Result<ArticleView> {
    let current = find_owned(db, user_id, slug).await?;
    let mut active: article::ActiveModel = current.clone().into();

    if let Some(title) = patch.title {
        let title = title.trim().to_string();
        validate_title(&title)?;
        if title != current.title {
            active.title = Set(title);
        }
    }
    if let Some(description) = patch.description {
        active.description = Set(description.trim().to_string());
    }
    if let Some(body) = patch.body {
        active.body = Set(body);
    }

    let retagged = match patch.tag_list {
        Some(names) => {
            tags::set_article_tags(db, current.id, &names).await?;
            true
        }
        None => false,
    };

    if !active.is_changed() && !retagged {
        return view_for(db, Some(user_id), current).await;
    }

    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;
    view_for(db, Some(user_id), updated).await
}

/// Delete an article and everything attached to it.
///
/// Only the author may delete. Tag edges, favorites, and comments go with
/// the article in one transaction; the tag vocabulary itself is untouched.
pub async fn delete_article<C: ConnectionTrait + TransactionTrait>(
    db: &C,
    user_id: i32,
    slug: &str,
) -> Result<()> {
    let article = find_owned(db, user_id, slug).await?;

    let txn = db.begin().await?;
    ArticleTag::delete_many()
        .filter(article_tag::Column::ArticleId.eq(article.id))
        .exec(&txn)
        .await?;
    Favorite::delete_many()
        .filter(favorite::Column::ArticleId.eq(article.id))
        .exec(&txn)
        .await?;
    Comment::delete_many()
        .filter(comment::Column::ArticleId.eq(article.id))
        .exec(&txn)
        .await?;
    let slug = article.slug.clone();
    article.delete(&txn).await?;
    txn.commit().await?;

    debug!("Deleted article '{}'", slug);
    Ok(())
}

/// Favorite an article. Idempotent.
pub async fn favorite<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    slug: &str,
) -> Result<ArticleView> {
    let article = find_by_slug(db, slug).await?;

    Favorite::insert(favorite::ActiveModel {
        user_id: Set(user_id),
        article_id: Set(article.id),
    })
    .on_conflict(
        OnConflict::columns([favorite::Column::UserId, favorite::Column::ArticleId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    view_for(db, Some(user_id), article).await
}

/// Remove a favorite. Idempotent.
pub async fn unfavorite<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    slug: &str,
) -> Result<ArticleView> {
    let article = find_by_slug(db, slug).await?;

    Favorite::delete_many()
        .filter(favorite::Column::UserId.eq(user_id))
        .filter(favorite::Column::ArticleId.eq(article.id))
        .exec(db)
        .await?;

    view_for(db, Some(user_id), article).await
}

/// Decorate a single article row for the viewer.
pub(crate) async fn view_for<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    article: article::Model,
) -> Result<ArticleView> {
    let mut views = feed::decorate(db, viewer_id, vec![article]).await?;
    views
        .pop()
        .ok_or_else(|| StoreError::Internal("decoration dropped an article".to_string()))
}
