//! Public profiles and the follow graph.

use model::entities::{follow, prelude::*, user};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

use crate::views::ProfileView;
use crate::{users, Result, StoreError};

/// Project a user row into its public profile.
pub fn project(user: &user::Model, following: bool) -> ProfileView {
    ProfileView {
        username: user.username.clone(),
        bio: user.bio.clone(),
        image: user.image.clone(),
        following,
    }
}

/// Whether `follower` currently follows `followee`.
pub async fn is_following<C: ConnectionTrait>(
    db: &C,
    follower_id: i32,
    followee_id: i32,
) -> Result<bool> {
    let edge = Follow::find_by_id((follower_id, followee_id)).one(db).await?;
    Ok(edge.is_some())
}

/// Fetch a profile by username, with the follow flag resolved for the viewer.
pub async fn get_profile<C: ConnectionTrait>(
    db: &C,
    viewer_id: Option<i32>,
    username: &str,
) -> Result<ProfileView> {
    let user = users::find_by_username(db, username).await?;
    let following = match viewer_id {
        Some(viewer_id) if viewer_id != user.id => is_following(db, viewer_id, user.id).await?,
        _ => false,
    };
    Ok(project(&user, following))
}

/// Follow a user. Idempotent: following an already-followed user succeeds.
pub async fn follow<C: ConnectionTrait>(
    db: &C,
    follower_id: i32,
    username: &str,
) -> Result<ProfileView> {
    let followee = users::find_by_username(db, username).await?;
    if followee.id == follower_id {
        return Err(StoreError::Validation("you cannot follow yourself".to_string()));
    }

    // The composite primary key makes the edge unique; a concurrent
    // duplicate insert is silently absorbed.
    Follow::insert(follow::ActiveModel {
        follower_id: Set(follower_id),
        followee_id: Set(followee.id),
    })
    .on_conflict(
        OnConflict::columns([follow::Column::FollowerId, follow::Column::FolloweeId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(db)
    .await?;

    debug!("User {} now follows {}", follower_id, followee.username);
    Ok(project(&followee, true))
}

/// Unfollow a user. Idempotent: unfollowing a non-followed user succeeds.
pub async fn unfollow<C: ConnectionTrait>(
    db: &C,
    follower_id: i32,
    username: &str,
) -> Result<ProfileView> {
    let followee = users::find_by_username(db, username).await?;
    if followee.id == follower_id {
        return Err(StoreError::Validation("you cannot unfollow yourself".to_string()));
    }

    Follow::delete_many()
        .filter(follow::Column::FollowerId.eq(follower_id))
        .filter(follow::Column::FolloweeId.eq(followee.id))
        .exec(db)
        .await?;

    Ok(project(&followee, false))
}
