//! Create `subscription_plans` and `user_subscriptions`.
//!
//! Amounts are stored in minor units (cents).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlans::Table)
                    .if_not_exists()
                    .col(uuid(SubscriptionPlans::Id).primary_key())
                    .col(string_len(SubscriptionPlans::Name, 100))
                    .col(string_len(SubscriptionPlans::Slug, 100).unique_key())
                    .col(text_null(SubscriptionPlans::Description))
                    .col(string_len(SubscriptionPlans::PlanType, 32))
                    .col(big_integer(SubscriptionPlans::PriceMonthlyCents).default(0))
                    .col(big_integer(SubscriptionPlans::PriceAnnualCents).default(0))
                    .col(string_len(SubscriptionPlans::Currency, 3).default("USD"))
                    .col(string_len(SubscriptionPlans::ContentAccessLevel, 32))
                    .col(json_binary(SubscriptionPlans::Features).default(Expr::cust("'[]'::jsonb")))
                    .col(integer(SubscriptionPlans::MaxUsers).default(1))
                    .col(boolean(SubscriptionPlans::IsActive).default(true))
                    .col(integer(SubscriptionPlans::SortOrder).default(0))
                    .col(integer(SubscriptionPlans::TrialDays).default(0))
                    .col(timestamp_with_time_zone(SubscriptionPlans::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(SubscriptionPlans::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSubscriptions::Table)
                    .if_not_exists()
                    .col(uuid(UserSubscriptions::Id).primary_key())
                    .col(uuid(UserSubscriptions::UserId))
                    .col(uuid(UserSubscriptions::PlanId))
                    .col(uuid_null(UserSubscriptions::OrganizationId))
                    .col(string_len(UserSubscriptions::Status, 16))
                    .col(big_integer(UserSubscriptions::AmountCents))
                    .col(string_len(UserSubscriptions::Currency, 3).default("USD"))
                    .col(string_len(UserSubscriptions::BillingCycle, 16))
                    .col(timestamp_with_time_zone(UserSubscriptions::CurrentPeriodStart))
                    .col(timestamp_with_time_zone(UserSubscriptions::CurrentPeriodEnd))
                    .col(timestamp_with_time_zone_null(UserSubscriptions::CancelledAt))
                    .col(text_null(UserSubscriptions::CancellationReason))
                    .col(boolean(UserSubscriptions::CancelAtPeriodEnd).default(false))
                    .col(timestamp_with_time_zone(UserSubscriptions::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(UserSubscriptions::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_user")
                            .from(UserSubscriptions::Table, UserSubscriptions::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_plan")
                            .from(UserSubscriptions::Table, UserSubscriptions::PlanId)
                            .to(SubscriptionPlans::Table, SubscriptionPlans::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_organization")
                            .from(UserSubscriptions::Table, UserSubscriptions::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSubscriptions::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SubscriptionPlans {
    Table,
    Id,
    Name,
    Slug,
    Description,
    PlanType,
    PriceMonthlyCents,
    PriceAnnualCents,
    Currency,
    ContentAccessLevel,
    Features,
    MaxUsers,
    IsActive,
    SortOrder,
    TrialDays,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserSubscriptions {
    Table,
    Id,
    UserId,
    PlanId,
    OrganizationId,
    Status,
    AmountCents,
    Currency,
    BillingCycle,
    CurrentPeriodStart,
    CurrentPeriodEnd,
    CancelledAt,
    CancellationReason,
    CancelAtPeriodEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles { Table, Id }

#[derive(DeriveIden)]
enum Organizations { Table, Id }
