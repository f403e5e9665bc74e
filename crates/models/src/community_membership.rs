use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::{CommunityMemberStatus, CommunityRole};
use crate::{community, user_profile};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "community_memberships")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub role: CommunityRole,
    pub status: CommunityMemberStatus,
    pub joined_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Community,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user_profile::Entity)
                .from(Column::UserId)
                .to(user_profile::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::Community => Entity::belongs_to(community::Entity)
                .from(Column::CommunityId)
                .to(community::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}
