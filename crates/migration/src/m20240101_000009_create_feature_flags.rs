//! Create `feature_flags`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeatureFlags::Table)
                    .if_not_exists()
                    .col(uuid(FeatureFlags::Id).primary_key())
                    .col(string_len(FeatureFlags::Name, 100))
                    .col(string_len(FeatureFlags::Key, 100).unique_key())
                    .col(text_null(FeatureFlags::Description))
                    .col(json_binary(FeatureFlags::DefaultValue).default(Expr::cust("'false'::jsonb")))
                    .col(integer(FeatureFlags::RolloutPercentage).default(0))
                    .col(string_len(FeatureFlags::Environment, 32).default("production"))
                    .col(boolean(FeatureFlags::IsActive).default(false))
                    .col(json_binary(FeatureFlags::Tags).default(Expr::cust("'[]'::jsonb")))
                    .col(string_len_null(FeatureFlags::Owner, 100))
                    .col(timestamp_with_time_zone_null(FeatureFlags::ArchivedAt))
                    .col(timestamp_with_time_zone(FeatureFlags::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(FeatureFlags::UpdatedAt).default(Expr::current_timestamp()))
                    .check(Expr::col(FeatureFlags::RolloutPercentage).between(0, 100))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FeatureFlags::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum FeatureFlags {
    Table,
    Id,
    Name,
    Key,
    Description,
    DefaultValue,
    RolloutPercentage,
    Environment,
    IsActive,
    Tags,
    Owner,
    ArchivedAt,
    CreatedAt,
    UpdatedAt,
}
