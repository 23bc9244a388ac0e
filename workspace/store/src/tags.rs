//! Tag vocabulary and article/tag edges.
//!
//! Tags are global and deduplicated by name; articles reference them through
//! the `article_tags` join table. Tag lists are always returned sorted.

use std::collections::HashSet;

use model::entities::{article_tag, prelude::*, tag};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{is_unique_violation, Result};

/// Find or create a tag by name.
pub async fn upsert_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<tag::Model> {
    if let Some(existing) = Tag::find().filter(tag::Column::Name.eq(name)).one(db).await? {
        return Ok(existing);
    }

    let inserted = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await;

    match inserted {
        Ok(tag) => Ok(tag),
        // Lost an insert race; the winner's row is what we want.
        Err(err) if is_unique_violation(&err) => Tag::find()
            .filter(tag::Column::Name.eq(name))
            .one(db)
            .await?
            .ok_or_else(|| err.into()),
        Err(err) => Err(err.into()),
    }
}

/// Replace an article's tag set with the given names.
///
/// Names are trimmed and deduplicated; empty names are dropped. Returns the
/// resulting tag list sorted alphabetically.
pub async fn set_article_tags<C: ConnectionTrait>(
    db: &C,
    article_id: i32,
    names: &[String],
) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut cleaned: Vec<String> = names
        .iter()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect();
    cleaned.sort();

    ArticleTag::delete_many()
        .filter(article_tag::Column::ArticleId.eq(article_id))
        .exec(db)
        .await?;

    for name in &cleaned {
        let tag = upsert_by_name(db, name).await?;
        ArticleTag::insert(article_tag::ActiveModel {
            article_id: Set(article_id),
            tag_id: Set(tag.id),
        })
        .on_conflict(
            OnConflict::columns([article_tag::Column::ArticleId, article_tag::Column::TagId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    }

    Ok(cleaned)
}

/// The sorted tag names attached to one article.
pub async fn names_for_article<C: ConnectionTrait>(db: &C, article_id: i32) -> Result<Vec<String>> {
    let edges = ArticleTag::find()
        .filter(article_tag::Column::ArticleId.eq(article_id))
        .all(db)
        .await?;
    let tag_ids: Vec<i32> = edges.into_iter().map(|edge| edge.tag_id).collect();

    let mut names: Vec<String> = Tag::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    names.sort();
    Ok(names)
}

/// All tag names attached to at least one article, sorted alphabetically.
///
/// Tags whose last article was deleted or re-tagged drop out of this list;
/// the tag rows themselves are kept.
pub async fn list_used<C: ConnectionTrait>(db: &C) -> Result<Vec<String>> {
    let used_ids: HashSet<i32> = ArticleTag::find()
        .all(db)
        .await?
        .into_iter()
        .map(|edge| edge.tag_id)
        .collect();

    let names = Tag::find()
        .filter(tag::Column::Id.is_in(used_ids))
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|tag| tag.name)
        .collect();
    Ok(names)
}
