//! Create `content_categories` and `content_items`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentCategories::Table)
                    .if_not_exists()
                    .col(uuid(ContentCategories::Id).primary_key())
                    .col(string_len(ContentCategories::Name, 100))
                    .col(string_len(ContentCategories::Slug, 100).unique_key())
                    .col(text_null(ContentCategories::Description))
                    .col(uuid_null(ContentCategories::ParentId))
                    .col(integer(ContentCategories::OrderIndex).default(0))
                    .col(string_len_null(ContentCategories::TheologicalDiscipline, 32))
                    .col(integer(ContentCategories::MovementRelevanceScore).default(5))
                    .col(json_binary_null(ContentCategories::ApestRelevance))
                    .col(json_binary(ContentCategories::Keywords).default(Expr::cust("'[]'::jsonb")))
                    .col(boolean(ContentCategories::IsActive).default(true))
                    .col(timestamp_with_time_zone(ContentCategories::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(ContentCategories::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_parent")
                            .from(ContentCategories::Table, ContentCategories::ParentId)
                            .to(ContentCategories::Table, ContentCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ContentItems::Table)
                    .if_not_exists()
                    .col(uuid(ContentItems::Id).primary_key())
                    .col(string_len(ContentItems::Title, 255))
                    .col(string_len(ContentItems::Slug, 100).unique_key())
                    .col(text_null(ContentItems::Excerpt))
                    .col(text_null(ContentItems::Content))
                    .col(uuid(ContentItems::AuthorId))
                    .col(json_binary(ContentItems::CoAuthors).default(Expr::cust("'[]'::jsonb")))
                    .col(string_len(ContentItems::ContentType, 32))
                    .col(string_len(ContentItems::Format, 32).default("text"))
                    .col(integer_null(ContentItems::WordCount))
                    .col(integer_null(ContentItems::EstimatedReadingTime))
                    .col(integer(ContentItems::ViewCount).default(0))
                    .col(integer(ContentItems::LikeCount).default(0))
                    .col(integer(ContentItems::ShareCount).default(0))
                    .col(integer(ContentItems::CommentCount).default(0))
                    .col(integer(ContentItems::BookmarkCount).default(0))
                    .col(uuid_null(ContentItems::PrimaryCategoryId))
                    .col(json_binary(ContentItems::Tags).default(Expr::cust("'[]'::jsonb")))
                    .col(json_binary(ContentItems::TheologicalThemes).default(Expr::cust("'[]'::jsonb")))
                    .col(uuid_null(ContentItems::SeriesId))
                    .col(integer_null(ContentItems::SeriesOrder))
                    .col(string_len(ContentItems::Visibility, 32).default("public"))
                    .col(string_len(ContentItems::Status, 32).default("draft"))
                    .col(double(ContentItems::NetworkAmplificationScore).default(0.0))
                    .col(string_len_null(ContentItems::FeaturedImageUrl, 512))
                    .col(string_len_null(ContentItems::VideoUrl, 512))
                    .col(string_len_null(ContentItems::AudioUrl, 512))
                    .col(string_len_null(ContentItems::MetaTitle, 255))
                    .col(text_null(ContentItems::MetaDescription))
                    .col(string_len(ContentItems::LicenseType, 32).default("all_rights_reserved"))
                    .col(boolean(ContentItems::AttributionRequired).default(true))
                    .col(timestamp_with_time_zone_null(ContentItems::PublishedAt))
                    .col(timestamp_with_time_zone_null(ContentItems::ScheduledAt))
                    .col(timestamp_with_time_zone(ContentItems::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(ContentItems::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_author")
                            .from(ContentItems::Table, ContentItems::AuthorId)
                            .to(UserProfiles::Table, UserProfiles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_primary_category")
                            .from(ContentItems::Table, ContentItems::PrimaryCategoryId)
                            .to(ContentCategories::Table, ContentCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContentItems::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(ContentCategories::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContentCategories {
    Table,
    Id,
    Name,
    Slug,
    Description,
    ParentId,
    OrderIndex,
    TheologicalDiscipline,
    MovementRelevanceScore,
    ApestRelevance,
    Keywords,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ContentItems {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    AuthorId,
    CoAuthors,
    ContentType,
    Format,
    WordCount,
    EstimatedReadingTime,
    ViewCount,
    LikeCount,
    ShareCount,
    CommentCount,
    BookmarkCount,
    PrimaryCategoryId,
    Tags,
    TheologicalThemes,
    SeriesId,
    SeriesOrder,
    Visibility,
    Status,
    NetworkAmplificationScore,
    FeaturedImageUrl,
    VideoUrl,
    AudioUrl,
    MetaTitle,
    MetaDescription,
    LicenseType,
    AttributionRequired,
    PublishedAt,
    ScheduledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfiles { Table, Id }
