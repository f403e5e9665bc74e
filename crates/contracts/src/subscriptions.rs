use models::enums::{BillingCycle, PlanType, SubscriptionStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub plan_type: PlanType,
    pub price_monthly_cents: i64,
    pub price_annual_cents: i64,
    pub currency: String,
    pub content_access_level: String,
    pub features: Value,
    pub max_users: i32,
    pub is_active: bool,
    pub sort_order: i32,
    pub trial_days: i32,
    pub is_free: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSubscriptionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub status: SubscriptionStatus,
    pub amount_cents: i64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub current_period_start: String,
    pub current_period_end: String,
    pub cancelled_at: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancel_at_period_end: bool,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
    pub plan: Option<PlanResponse>,
}
