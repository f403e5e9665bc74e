use sea_orm::{entity::prelude::*, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::enums::{AccountStatus, CulturalContext, LeaderTier, MinistryRole, SubscriptionTier};
use crate::json::{BrandColors, EmailNotifications, PrivacySettings, StringList};

/// A platform user. `id` is the hosted identity provider's subject.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub ministry_role: MinistryRole,
    pub denomination: Option<String>,
    pub organization_name: Option<String>,
    pub years_in_ministry: Option<i32>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub language_primary: String,
    pub cultural_context: Option<CulturalContext>,
    pub leader_tier: Option<LeaderTier>,
    #[sea_orm(unique)]
    pub subdomain: Option<String>,
    #[sea_orm(unique)]
    pub custom_domain: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub brand_colors: Option<BrandColors>,
    pub subscription_tier: SubscriptionTier,
    #[sea_orm(column_type = "JsonBinary")]
    pub theological_focus: StringList,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub email_notifications: Option<EmailNotifications>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub privacy_settings: Option<PrivacySettings>,
    pub onboarding_completed: bool,
    pub onboarding_step: i32,
    pub account_status: AccountStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub last_active_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, DbErr> {
    Entity::find().filter(Column::Email.eq(email.to_lowercase())).one(db).await
}

pub async fn find_by_ids<C: ConnectionTrait>(db: &C, ids: Vec<Uuid>) -> Result<Vec<Model>, DbErr> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    Entity::find().filter(Column::Id.is_in(ids)).all(db).await
}
