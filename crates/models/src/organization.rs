use sea_orm::{entity::prelude::*, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::enums::{LicenseType, OrganizationStatus, OrganizationType, SizeCategory};
use crate::json::Address;
use crate::user_profile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub organization_type: OrganizationType,
    pub size_category: Option<SizeCategory>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub address: Option<Address>,
    pub license_type: LicenseType,
    pub max_users: i32,
    pub billing_email: Option<String>,
    pub account_owner_id: Option<Uuid>,
    pub status: OrganizationStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    AccountOwner,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::AccountOwner => Entity::belongs_to(user_profile::Entity)
                .from(Column::AccountOwnerId)
                .to(user_profile::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn slug_exists<C: ConnectionTrait>(db: &C, slug: &str) -> Result<bool, DbErr> {
    Ok(Entity::find().filter(Column::Slug.eq(slug)).count(db).await? > 0)
}
