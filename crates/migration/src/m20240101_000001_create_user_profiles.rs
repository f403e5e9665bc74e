//! Create `user_profiles` table.
//!
//! One row per hosted-identity user; `id` is the identity provider's subject.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfiles::Table)
                    .if_not_exists()
                    .col(uuid(UserProfiles::Id).primary_key())
                    .col(string_len(UserProfiles::Email, 255).unique_key())
                    .col(string_len(UserProfiles::FirstName, 100))
                    .col(string_len(UserProfiles::LastName, 100))
                    .col(string_len_null(UserProfiles::DisplayName, 100))
                    .col(text_null(UserProfiles::Bio))
                    .col(string_len_null(UserProfiles::AvatarUrl, 512))
                    .col(string_len(UserProfiles::MinistryRole, 32))
                    .col(string_len_null(UserProfiles::Denomination, 100))
                    .col(string_len_null(UserProfiles::OrganizationName, 255))
                    .col(integer_null(UserProfiles::YearsInMinistry))
                    .col(string_len_null(UserProfiles::CountryCode, 2))
                    .col(string_len_null(UserProfiles::Timezone, 64))
                    .col(string_len(UserProfiles::LanguagePrimary, 10).default("en"))
                    .col(string_len_null(UserProfiles::CulturalContext, 32))
                    .col(string_len_null(UserProfiles::LeaderTier, 32))
                    .col(string_len_null(UserProfiles::Subdomain, 100).unique_key())
                    .col(string_len_null(UserProfiles::CustomDomain, 255).unique_key())
                    .col(json_binary_null(UserProfiles::BrandColors))
                    .col(string_len(UserProfiles::SubscriptionTier, 32).default("free"))
                    .col(json_binary(UserProfiles::TheologicalFocus).default(Expr::cust("'[]'::jsonb")))
                    .col(json_binary_null(UserProfiles::EmailNotifications))
                    .col(json_binary_null(UserProfiles::PrivacySettings))
                    .col(boolean(UserProfiles::OnboardingCompleted).default(false))
                    .col(integer(UserProfiles::OnboardingStep).default(1))
                    .col(string_len(UserProfiles::AccountStatus, 32).default("pending_verification"))
                    .col(timestamp_with_time_zone(UserProfiles::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(UserProfiles::UpdatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(UserProfiles::LastActiveAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserProfiles::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserProfiles {
    Table,
    Id,
    Email,
    FirstName,
    LastName,
    DisplayName,
    Bio,
    AvatarUrl,
    MinistryRole,
    Denomination,
    OrganizationName,
    YearsInMinistry,
    CountryCode,
    Timezone,
    LanguagePrimary,
    CulturalContext,
    LeaderTier,
    Subdomain,
    CustomDomain,
    BrandColors,
    SubscriptionTier,
    TheologicalFocus,
    EmailNotifications,
    PrivacySettings,
    OnboardingCompleted,
    OnboardingStep,
    AccountStatus,
    CreatedAt,
    UpdatedAt,
    LastActiveAt,
}
