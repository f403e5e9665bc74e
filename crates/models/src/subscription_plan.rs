use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::PlanType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscription_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub plan_type: PlanType,
    pub price_monthly_cents: i64,
    pub price_annual_cents: i64,
    pub currency: String,
    pub content_access_level: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub features: Json,
    pub max_users: i32,
    pub is_active: bool,
    pub sort_order: i32,
    pub trial_days: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations defined here")
    }
}

impl ActiveModelBehavior for ActiveModel {}
