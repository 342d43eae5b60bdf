use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::SuggestionStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trick_suggestions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub category: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub technique: Option<String>,

    pub video_url: Option<String>,

    pub suggested_by: i32,

    pub status: SuggestionStatus,

    pub moderated_by: Option<i32>,

    #[sea_orm(column_type = "Text", nullable)]
    pub moderation_comment: Option<String>,

    pub created_at: DateTimeUtc,

    pub moderated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SuggestedBy",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Suggester,

    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ModeratedBy",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Moderator,
}

impl ActiveModelBehavior for ActiveModel {}
