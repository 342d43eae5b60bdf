use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per (user, trick); the pair is unique (see `m20250605_ledger_indexes`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub trick_id: i32,
    pub learned_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::tricks::Entity",
        from = "Column::TrickId",
        to = "super::tricks::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Trick,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::tricks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trick.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
