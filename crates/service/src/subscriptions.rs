use contracts::subscriptions::{PlanResponse, UserSubscriptionResponse};
use models::{subscription_plan, user_subscription};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::mappers::subscriptions::{to_plan, to_user_subscription};

/// Active plans in display order.
#[instrument(skip(db))]
pub async fn list_plans(db: &DatabaseConnection) -> Result<Vec<PlanResponse>, ServiceError> {
    let plans = subscription_plan::Entity::find()
        .filter(subscription_plan::Column::IsActive.eq(true))
        .order_by_asc(subscription_plan::Column::SortOrder)
        .all(db)
        .await?;
    Ok(plans.into_iter().map(to_plan).collect())
}

/// The caller's subscriptions with their plans, newest first.
#[instrument(skip(db))]
pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<UserSubscriptionResponse>, ServiceError> {
    let rows = user_subscription::Entity::find()
        .filter(user_subscription::Column::UserId.eq(user_id))
        .order_by_desc(user_subscription::Column::CreatedAt)
        .find_also_related(subscription_plan::Entity)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|(s, p)| to_user_subscription(s, p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_user};

    #[tokio::test]
    async fn plans_and_user_subscriptions() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let plans = list_plans(&db).await?;
        assert!(plans.windows(2).all(|w| w[0].sort_order <= w[1].sort_order));
        assert!(plans.iter().all(|p| p.is_active));

        let user = seed_user(&db, "subscriber").await?;
        assert!(list_for_user(&db, user.id).await?.is_empty());
        Ok(())
    }
}
