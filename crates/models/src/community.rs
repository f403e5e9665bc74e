use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::{CommunityType, CommunityVisibility, CulturalContext, ModerationLevel};
use crate::user_profile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "communities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub community_type: CommunityType,
    pub cultural_context: CulturalContext,
    pub visibility: CommunityVisibility,
    pub join_approval_required: bool,
    pub max_members: Option<i32>,
    pub moderation_level: ModerationLevel,
    pub current_member_count: i32,
    pub created_by: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Creator,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Creator => Entity::belongs_to(user_profile::Entity)
                .from(Column::CreatedBy)
                .to(user_profile::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_full(&self) -> bool {
        matches!(self.max_members, Some(max) if self.current_member_count >= max)
    }
}
