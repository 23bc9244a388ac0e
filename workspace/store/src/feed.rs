//! Article listings: the filtered global list and the personalized feed.
//!
//! Both listings count before paginating, order newest-first, and decorate
//! each article with viewer-dependent state in a fixed number of queries
//! regardless of page size.

use std::collections::{HashMap, HashSet};

use model::entities::{article, article_tag, favorite, follow, prelude::*, tag, user};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::views::{ArticlePage, ArticleView, ProfileView};
use crate::{profiles, Page, Result};

/// Optional filters for the global article list. All active filters must
/// match (they are ANDed).
#[derive(Debug, Clone, Default)]
pub struct ArticleFilters {
    /// Only articles carrying this tag.
    pub tag: Option<String>,
    /// Only articles authored by this username.
    pub author: Option<String>,
    /// Only articles favorited by this username.
    pub favorited: Option<String>,
}

fn empty_page() -> ArticlePage {
    ArticlePage {
        articles: Vec::new(),
        articles_count: 0,
    }
}

/// List articles newest-first, with optional filters and pagination.
///
/// Filters naming an unknown tag or user match nothing rather than erroring.
/// The count reflects the filtered total, not the returned page.
pub async fn list_articles<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    filters: &ArticleFilters,
    page: Page,
) -> Result<ArticlePage> {
    let mut query = Article::find();

    if let Some(author) = &filters.author {
        match User::find()
            .filter(user::Column::Username.eq(author))
            .one(db)
            .await?
        {
            Some(user) => query = query.filter(article::Column::AuthorId.eq(user.id)),
            None => return Ok(empty_page()),
        }
    }

    if let Some(username) = &filters.favorited {
        let user = match User::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?
        {
            Some(user) => user,
            None => return Ok(empty_page()),
        };
        let favorited_ids: Vec<i32> = Favorite::find()
            .filter(favorite::Column::UserId.eq(user.id))
            .all(db)
            .await?
            .into_iter()
            .map(|edge| edge.article_id)
            .collect();
        if favorited_ids.is_empty() {
            return Ok(empty_page());
        }
        query = query.filter(article::Column::Id.is_in(favorited_ids));
    }

    if let Some(tag_name) = &filters.tag {
        let tag = match Tag::find()
            .filter(tag::Column::Name.eq(tag_name))
            .one(db)
            .await?
        {
            Some(tag) => tag,
            None => return Ok(empty_page()),
        };
        let tagged_ids: Vec<i32> = ArticleTag::find()
            .filter(article_tag::Column::TagId.eq(tag.id))
            .all(db)
            .await?
            .into_iter()
            .map(|edge| edge.article_id)
            .collect();
        if tagged_ids.is_empty() {
            return Ok(empty_page());
        }
        query = query.filter(article::Column::Id.is_in(tagged_ids));
    }

    paginate(db, viewer_id, query, page).await
}

/// List articles authored by users the viewer follows, newest-first.
pub async fn list_feed<C: ConnectionTrait>(
    db: &C,
    viewer_id: i32,
    page: Page,
) -> Result<ArticlePage> {
    let followed_ids: Vec<i32> = Follow::find()
        .filter(follow::Column::FollowerId.eq(viewer_id))
        .all(db)
        .await?
        .into_iter()
        .map(|edge| edge.followee_id)
        .collect();
    if followed_ids.is_empty() {
        return Ok(empty_page());
    }

    let query = Article::find().filter(article::Column::AuthorId.is_in(followed_ids));
    paginate(db, Some(viewer_id), query, page).await
}

async fn paginate<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    query: sea_orm::Select<Article>,
    page: Page,
) -> Result<ArticlePage> {
    let articles_count = query.clone().count(db).await?;

    let rows = query
        .order_by_desc(article::Column::CreatedAt)
        .order_by_desc(article::Column::Id)
        .offset(page.offset)
        .limit(page.limit)
        .all(db)
        .await?;

    Ok(ArticlePage {
        articles: decorate(db, viewer_id, rows).await?,
        articles_count,
    })
}

/// Decorate a batch of article rows for the viewer.
///
/// Loads authors, tag names, favorite edges, and the viewer's follow edges
/// once for the whole batch, then assembles views in the input order.
pub(crate) async fn decorate<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    rows: Vec<article::Model>,
) -> Result<Vec<ArticleView>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let article_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
    let author_ids: HashSet<i32> = rows.iter().map(|row| row.author_id).collect();

    let authors: HashMap<i32, user::Model> = User::find()
        .filter(user::Column::Id.is_in(author_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let tag_edges = ArticleTag::find()
        .filter(article_tag::Column::ArticleId.is_in(article_ids.clone()))
        .all(db)
        .await?;
    let tag_ids: HashSet<i32> = tag_edges.iter().map(|edge| edge.tag_id).collect();
    let tag_names: HashMap<i32, String> = Tag::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|tag| (tag.id, tag.name))
        .collect();
    let mut tags_by_article: HashMap<i32, Vec<String>> = HashMap::new();
    for edge in tag_edges {
        if let Some(name) = tag_names.get(&edge.tag_id) {
            tags_by_article
                .entry(edge.article_id)
                .or_default()
                .push(name.clone());
        }
    }
    for names in tags_by_article.values_mut() {
        names.sort();
    }

    let favorite_edges = Favorite::find()
        .filter(favorite::Column::ArticleId.is_in(article_ids))
        .all(db)
        .await?;
    let mut favorite_counts: HashMap<i32, u64> = HashMap::new();
    let mut viewer_favorites: HashSet<i32> = HashSet::new();
    for edge in favorite_edges {
        *favorite_counts.entry(edge.article_id).or_default() += 1;
        if viewer_id == Some(edge.user_id) {
            viewer_favorites.insert(edge.article_id);
        }
    }

    let followed_authors: HashSet<i32> = match viewer_id {
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
                Some(author) => profiles::project(author, followed_authors.contains(&author.id)),
                // Author row missing under concurrent deletion; keep the
                // listing alive with a placeholder rather than failing it.
                None => ProfileView {
                    username: String::new(),
                    bio: None,
                    image: None,
                    following: false,
                },
            };
            ArticleView {
                favorited: viewer_favorites.contains(&row.id),
                favorites_count: favorite_counts.get(&row.id).copied().unwrap_or(0),
                tag_list: tags_by_article.remove(&row.id).unwrap_or_default(),
                slug: row.slug,
                title: row.title,
                description: row.description,
                body: row.body,
                created_at: row.created_at,
                updated_at: row.updated_at,
                author,
            }
        })
        .collect();
    Ok(views)
}
