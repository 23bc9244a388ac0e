//! URL slug generation for articles.

use model::entities::{article, prelude::*};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::Result;

async fn slug_taken<C: ConnectionTrait>(db: &C, slug: &str) -> Result<bool> {
    let existing = Article::find()
        .filter(article::Column::Slug.eq(slug))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

/// Derive a unique slug from an article title.
///
/// The base is the lowercased, hyphenated form of the title; a title that
/// slugifies to nothing falls back to "untitled". Collisions get a numeric
/// suffix: "how-to-train-your-dragon-2", "-3", and so on.
pub async fn unique_for_title<C: ConnectionTrait>(db: &C, title: &str) -> Result<String> {
    let base = ::slug::slugify(title);
    let base = if base.is_empty() { "untitled".to_string() } else { base };

    if !slug_taken(db, &base).await? {
        return Ok(base);
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}-{n}");
        if !slug_taken(db, &candidate).await? {
            return Ok(candidate);
        }
        n += 1;
    }
}
