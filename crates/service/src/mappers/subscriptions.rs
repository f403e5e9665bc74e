use contracts::subscriptions::{PlanResponse, UserSubscriptionResponse};
use models::enums::SubscriptionStatus;
use models::{subscription_plan, user_subscription};

use super::{opt_ts, ts};

pub fn to_plan(p: subscription_plan::Model) -> PlanResponse {
    PlanResponse {
        is_free: p.price_monthly_cents == 0 && p.price_annual_cents == 0,
        id: p.id,
        name: p.name,
        slug: p.slug,
        description: p.description.unwrap_or_default(),
        plan_type: p.plan_type,
        price_monthly_cents: p.price_monthly_cents,
        price_annual_cents: p.price_annual_cents,
        currency: p.currency,
        content_access_level: p.content_access_level,
        features: p.features,
        max_users: p.max_users,
        is_active: p.is_active,
        sort_order: p.sort_order,
        trial_days: p.trial_days,
        created_at: ts(&p.created_at),
        updated_at: ts(&p.updated_at),
    }
}

pub fn to_user_subscription(
    s: user_subscription::Model,
    plan: Option<subscription_plan::Model>,
) -> UserSubscriptionResponse {
    UserSubscriptionResponse {
        is_active: matches!(s.status, SubscriptionStatus::Active | SubscriptionStatus::Trialing),
        plan: plan.map(to_plan),
        id: s.id,
        user_id: s.user_id,
        plan_id: s.plan_id,
        organization_id: s.organization_id,
        status: s.status,
        amount_cents: s.amount_cents,
        currency: s.currency,
        billing_cycle: s.billing_cycle,
        current_period_start: ts(&s.current_period_start),
        current_period_end: ts(&s.current_period_end),
        cancelled_at: opt_ts(&s.cancelled_at),
        cancellation_reason: s.cancellation_reason,
        cancel_at_period_end: s.cancel_at_period_end,
        created_at: ts(&s.created_at),
        updated_at: ts(&s.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::fixtures::at;
    use models::enums::{BillingCycle, PlanType};
    use uuid::Uuid;

    fn plan(monthly: i64) -> subscription_plan::Model {
        subscription_plan::Model {
            id: Uuid::new_v4(),
            name: "Leader".into(),
            slug: "leader".into(),
            description: None,
            plan_type: PlanType::Leader,
            price_monthly_cents: monthly,
            price_annual_cents: monthly * 10,
            currency: "USD".into(),
            content_access_level: "premium".into(),
            features: serde_json::json!(["courses"]),
            max_users: 1,
            is_active: true,
            sort_order: 2,
            trial_days: 14,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    #[test]
    fn free_plan_is_flagged() {
        assert!(to_plan(plan(0)).is_free);
        let paid = to_plan(plan(2900));
        assert!(!paid.is_free);
        assert_eq!(paid.description, "");
    }

    #[test]
    fn trialing_counts_as_active() {
        let p = plan(2900);
        let s = user_subscription::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: p.id,
            organization_id: None,
            status: SubscriptionStatus::Trialing,
            amount_cents: 2900,
            currency: "USD".into(),
            billing_cycle: BillingCycle::Monthly,
            current_period_start: at(0),
            current_period_end: at(86_400 * 30),
            cancelled_at: None,
            cancellation_reason: None,
            cancel_at_period_end: false,
            created_at: at(0),
            updated_at: at(0),
        };
        let dto = to_user_subscription(s, Some(p));
        assert!(dto.is_active);
        assert_eq!(dto.plan.map(|p| p.slug), Some("leader".to_string()));
    }
}
