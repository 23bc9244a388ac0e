//! Comments on articles.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use model::entities::{comment, follow, prelude::*, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::views::{CommentView, ProfileView};
use crate::{articles, profiles, users, Result, StoreError};

/// Add a comment to the article at `slug`.
pub async fn add_comment<C: ConnectionTrait>(
    db: &C,
    author_id: i32,
    slug: &str,
    body: &str,
) -> Result<CommentView> {
    let body = body.trim();
    if body.is_empty() {
        return Err(StoreError::Validation("comment body must not be empty".to_string()));
    }

    let article = articles::find_by_slug(db, slug).await?;
    let author = users::find_by_id(db, author_id).await?;

    let now = Utc::now();
    let comment = comment::ActiveModel {
        article_id: Set(article.id),
        author_id: Set(author_id),
        body: Set(body.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(CommentView {
        id: comment.id,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
        body: comment.body,
        // One's own comment is never marked as following oneself
        author: profiles::project(&author, false),
    })
}

/// List an article's comments oldest-first, with author profiles resolved
/// for the viewer.
pub async fn list_comments<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    slug: &str,
) -> Result<Vec<CommentView>> {
    let article = articles::find_by_slug(db, slug).await?;

    let rows = Comment::find()
        .filter(comment::Column::ArticleId.eq(article.id))
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await?;
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids: HashSet<i32> = rows.iter().map(|row| row.author_id).collect();
    let authors: HashMap<i32, user::Model> = User::find()
        .filter(user::Column::Id.is_in(author_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let followed: HashSet<i32> = match viewer_id {
        Some(viewer_id) => Follow::find()
            .filter(follow::Column::FollowerId.eq(viewer_id))
            .filter(follow::Column::FolloweeId.is_in(author_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|edge| edge.followee_id)
            .collect(),
        None => HashSet::new(),
    };

    let views = rows
        .into_iter()
        .map(|row| {
            let author = match authors.get(&row.author_id) {
                Some(author) => profiles::project(author, followed.contains(&author.id)),
                None => ProfileView {
                    username: String::new(),
                    bio: None,
                    image: None,
                    following: false,
                },
            };
            CommentView {
                id: row.id,
                created_at: row.created_at,
                updated_at: row.updated_at,
                body: row.body,
                author,
            }
        })
        .collect();
    Ok(views)
}

/// Delete a comment from the article at `slug`.
///
/// Only the comment's author may delete it. A comment id that exists but
/// belongs to a different article is treated as not found.
pub async fn delete_comment<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    slug: &str,
    comment_id: i32,
) -> Result<()> {
    let article = articles::find_by_slug(db, slug).await?;

    let comment = Comment::find_by_id(comment_id)
        .one(db)
        .await?
        .filter(|comment| comment.article_id == article.id)
        .ok_or(StoreError::NotFound("comment"))?;

    if comment.author_id != user_id {
        return Err(StoreError::Authorization(
            "only the author may delete this comment".to_string(),
        ));
    }

    comment.delete(db).await?;
    Ok(())
}
