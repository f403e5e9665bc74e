//! Create `audit_logs`. Rows outlive their user (FK set null).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(uuid(AuditLogs::Id).primary_key())
                    .col(uuid_null(AuditLogs::UserId))
                    .col(string_len(AuditLogs::Action, 64))
                    .col(string_len(AuditLogs::Resource, 64))
                    .col(uuid_null(AuditLogs::ResourceId))
                    .col(string_len(AuditLogs::RiskLevel, 16).default("low"))
                    .col(json_binary_null(AuditLogs::OldValues))
                    .col(json_binary_null(AuditLogs::NewValues))
                    .col(string_len_null(AuditLogs::IpAddress, 64))
                    .col(text_null(AuditLogs::UserAgent))
                    .col(string_len_null(AuditLogs::RequestId, 64))
                    .col(string_len_null(AuditLogs::Endpoint, 255))
                    .col(string_len_null(AuditLogs::HttpMethod, 16))
                    .col(json_binary_null(AuditLogs::Metadata))
                    .col(timestamp_with_time_zone(AuditLogs::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_user")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AuditLogs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    UserId,
    Action,
    Resource,
    ResourceId,
    RiskLevel,
    OldValues,
    NewValues,
    IpAddress,
    UserAgent,
    RequestId,
    Endpoint,
    HttpMethod,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles { Table, Id }
