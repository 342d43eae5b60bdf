use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::AchievementKind;

/// Achievement definition. `condition_type` plus `condition_value` /
/// `condition_data` are decoded into an [`crate::achievements::Condition`].
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub icon: Option<String>,

    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: AchievementKind,

    pub condition_type: String,

    pub condition_value: Option<i32>,

    /// JSON payload, e.g. `{"category": "spins"}`
    #[sea_orm(column_type = "Text", nullable)]
    pub condition_data: Option<String>,

    pub points: i32,

    pub badge_color: String,

    pub created_at: DateTimeUtc,

    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_achievements::Entity")]
    UserAchievements,
}

impl Related<super::user_achievements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserAchievements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
