use super::user;
use sea_orm::entity::prelude::*;

/// A follower-followee edge between two users. Pair-unique via the composite
/// primary key; the store rejects self-follows before insertion.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub follower_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub followee_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::FollowerId",
        to = "user::Column::Id"
    )]
    Follower,
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::FolloweeId",
        to = "user::Column::Id"
    )]
    Followee,
}

impl ActiveModelBehavior for ActiveModel {}
