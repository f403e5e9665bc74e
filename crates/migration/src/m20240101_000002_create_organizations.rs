//! Create `organizations` and `organization_memberships`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Organizations::Table)
                    .if_not_exists()
                    .col(uuid(Organizations::Id).primary_key())
                    .col(string_len(Organizations::Name, 255))
                    .col(string_len(Organizations::Slug, 100).unique_key())
                    .col(text_null(Organizations::Description))
                    .col(string_len_null(Organizations::Website, 512))
                    .col(string_len_null(Organizations::LogoUrl, 512))
                    .col(string_len(Organizations::OrganizationType, 32))
                    .col(string_len_null(Organizations::SizeCategory, 32))
                    .col(string_len_null(Organizations::ContactEmail, 255))
                    .col(string_len_null(Organizations::ContactPhone, 32))
                    .col(json_binary_null(Organizations::Address))
                    .col(string_len(Organizations::LicenseType, 32).default("individual"))
                    .col(integer(Organizations::MaxUsers).default(1))
                    .col(string_len_null(Organizations::BillingEmail, 255))
                    .col(uuid_null(Organizations::AccountOwnerId))
                    .col(string_len(Organizations::Status, 32).default("trial"))
                    .col(timestamp_with_time_zone(Organizations::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Organizations::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_organizations_account_owner")
                            .from(Organizations::Table, Organizations::AccountOwnerId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrganizationMemberships::Table)
                    .if_not_exists()
                    .col(uuid(OrganizationMemberships::Id).primary_key())
                    .col(uuid(OrganizationMemberships::UserId))
                    .col(uuid(OrganizationMemberships::OrganizationId))
                    .col(string_len(OrganizationMemberships::Role, 16).default("member"))
                    .col(json_binary(OrganizationMemberships::Permissions).default(Expr::cust("'[]'::jsonb")))
                    .col(string_len(OrganizationMemberships::Status, 16).default("pending"))
                    .col(timestamp_with_time_zone_null(OrganizationMemberships::JoinedAt))
                    .col(timestamp_with_time_zone_null(OrganizationMemberships::InvitedAt))
                    .col(uuid_null(OrganizationMemberships::InvitedBy))
                    .col(timestamp_with_time_zone(OrganizationMemberships::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(OrganizationMemberships::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_membership_user")
                            .from(OrganizationMemberships::Table, OrganizationMemberships::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_membership_organization")
                            .from(OrganizationMemberships::Table, OrganizationMemberships::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_org_membership_invited_by")
                            .from(OrganizationMemberships::Table, OrganizationMemberships::InvitedBy)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership per user and organization
        manager
            .create_index(
                Index::create()
                    .name("uniq_org_membership_user_org")
                    .table(OrganizationMemberships::Table)
                    .col(OrganizationMemberships::UserId)
                    .col(OrganizationMemberships::OrganizationId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrganizationMemberships::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Organizations::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Website,
    LogoUrl,
    OrganizationType,
    SizeCategory,
    ContactEmail,
    ContactPhone,
    Address,
    LicenseType,
    MaxUsers,
    BillingEmail,
    AccountOwnerId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrganizationMemberships {
    Table,
    Id,
    UserId,
    OrganizationId,
    Role,
    Permissions,
    Status,
    JoinedAt,
    InvitedAt,
    InvitedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles { Table, Id }
