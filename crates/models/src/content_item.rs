use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::enums::{ContentFormat, ContentLicense, ContentStatus, ContentType, ContentVisibility};
use crate::json::{StringList, UuidList};
use crate::{content_category, user_profile};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,
    pub author_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub co_authors: UuidList,
    pub content_type: ContentType,
    pub format: ContentFormat,
    pub word_count: Option<i32>,
    pub estimated_reading_time: Option<i32>,
    pub view_count: i32,
    pub like_count: i32,
    pub share_count: i32,
    pub comment_count: i32,
    pub bookmark_count: i32,
    pub primary_category_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: StringList,
    #[sea_orm(column_type = "JsonBinary")]
    pub theological_themes: StringList,
    pub series_id: Option<Uuid>,
    pub series_order: Option<i32>,
    pub visibility: ContentVisibility,
    pub status: ContentStatus,
    pub network_amplification_score: f64,
    pub featured_image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub meta_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub meta_description: Option<String>,
    pub license_type: ContentLicense,
    pub attribution_required: bool,
    pub published_at: Option<DateTimeWithTimeZone>,
    pub scheduled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Author,
    PrimaryCategory,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Author => Entity::belongs_to(user_profile::Entity)
                .from(Column::AuthorId)
                .to(user_profile::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Relation::PrimaryCategory => Entity::belongs_to(content_category::Entity)
                .from(Column::PrimaryCategoryId)
                .to(content_category::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
        }
    }
}

impl Related<user_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<content_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PrimaryCategory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
