//! Create `communities` and `community_memberships`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Communities::Table)
                    .if_not_exists()
                    .col(uuid(Communities::Id).primary_key())
                    .col(string_len(Communities::Name, 255))
                    .col(string_len(Communities::Slug, 100).unique_key())
                    .col(text_null(Communities::Description))
                    .col(string_len(Communities::CommunityType, 32))
                    .col(string_len(Communities::CulturalContext, 32).default("global"))
                    .col(string_len(Communities::Visibility, 32).default("public"))
                    .col(boolean(Communities::JoinApprovalRequired).default(false))
                    .col(integer_null(Communities::MaxMembers))
                    .col(string_len(Communities::ModerationLevel, 16).default("moderated"))
                    .col(integer(Communities::CurrentMemberCount).default(0))
                    .col(uuid(Communities::CreatedBy))
                    .col(boolean(Communities::IsActive).default(true))
                    .col(timestamp_with_time_zone(Communities::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Communities::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_creator")
                            .from(Communities::Table, Communities::CreatedBy)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CommunityMemberships::Table)
                    .if_not_exists()
                    .col(uuid(CommunityMemberships::Id).primary_key())
                    .col(uuid(CommunityMemberships::UserId))
                    .col(uuid(CommunityMemberships::CommunityId))
                    .col(string_len(CommunityMemberships::Role, 16).default("member"))
                    .col(string_len(CommunityMemberships::Status, 16).default("active"))
                    .col(timestamp_with_time_zone(CommunityMemberships::JoinedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(CommunityMemberships::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(CommunityMemberships::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_membership_user")
                            .from(CommunityMemberships::Table, CommunityMemberships::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_community_membership_community")
                            .from(CommunityMemberships::Table, CommunityMemberships::CommunityId)
                            .to(Communities::Table, Communities::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_community_membership_user_community")
                    .table(CommunityMemberships::Table)
                    .col(CommunityMemberships::UserId)
                    .col(CommunityMemberships::CommunityId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommunityMemberships::Table).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Communities::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Communities {
    Table,
    Id,
    Name,
    Slug,
    Description,
    CommunityType,
    CulturalContext,
    Visibility,
    JoinApprovalRequired,
    MaxMembers,
    ModerationLevel,
    CurrentMemberCount,
    CreatedBy,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CommunityMemberships {
    Table,
    Id,
    UserId,
    CommunityId,
    Role,
    Status,
    JoinedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles { Table, Id }
