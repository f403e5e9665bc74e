use chrono::{DateTime, FixedOffset};
use models::enums::{ContentFormat, ContentLicense, ContentStatus, ContentType, ContentVisibility};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, Validator};

pub const CONTENT_SORTS: &[&str] = &["publishedAt", "createdAt", "viewCount", "title"];
const MAX_TAGS: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub content_type: ContentType,
    pub format: Option<ContentFormat>,
    pub word_count: Option<i32>,
    pub estimated_reading_time: Option<i32>,
    pub primary_category_id: Option<Uuid>,
    #[serde(default)]
    pub co_authors: Vec<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub theological_themes: Vec<String>,
    pub series_id: Option<Uuid>,
    pub series_order: Option<i32>,
    pub visibility: Option<ContentVisibility>,
    pub status: Option<ContentStatus>,
    pub featured_image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub license_type: Option<ContentLicense>,
    pub attribution_required: Option<bool>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
}

impl Validate for CreateContentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.length("title", &self.title, 1, 255)
            .slug("slug", &self.slug)
            .opt_length("excerpt", self.excerpt.as_deref(), 0, 500)
            .range_i64("wordCount", self.word_count.map(i64::from), 0, 1_000_000)
            .range_i64("estimatedReadingTime", self.estimated_reading_time.map(i64::from), 0, 10_000)
            .list_len("coAuthors", &self.co_authors, 0, 10)
            .list_len("tags", &self.tags, 0, MAX_TAGS)
            .list_len("theologicalThemes", &self.theological_themes, 0, MAX_TAGS)
            .range_i64("seriesOrder", self.series_order.map(i64::from), 1, 10_000)
            .url("featuredImageUrl", self.featured_image_url.as_deref())
            .url("videoUrl", self.video_url.as_deref())
            .url("audioUrl", self.audio_url.as_deref())
            .opt_length("metaTitle", self.meta_title.as_deref(), 1, 255)
            .opt_length("metaDescription", self.meta_description.as_deref(), 0, 500);
        if self.status == Some(ContentStatus::Scheduled) && self.scheduled_at.is_none() {
            v.fail("scheduledAt", "is required when status is scheduled", "custom");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub content_type: Option<ContentType>,
    pub format: Option<ContentFormat>,
    pub primary_category_id: Option<Uuid>,
    pub tags: Option<Vec<String>>,
    pub theological_themes: Option<Vec<String>>,
    pub series_id: Option<Uuid>,
    pub series_order: Option<i32>,
    pub visibility: Option<ContentVisibility>,
    pub status: Option<ContentStatus>,
    pub featured_image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub license_type: Option<ContentLicense>,
    pub attribution_required: Option<bool>,
    pub scheduled_at: Option<DateTime<FixedOffset>>,
}

impl Validate for UpdateContentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("title", self.title.as_deref(), 1, 255)
            .opt_length("excerpt", self.excerpt.as_deref(), 0, 500)
            .range_i64("seriesOrder", self.series_order.map(i64::from), 1, 10_000)
            .url("featuredImageUrl", self.featured_image_url.as_deref())
            .url("videoUrl", self.video_url.as_deref())
            .url("audioUrl", self.audio_url.as_deref())
            .opt_length("metaTitle", self.meta_title.as_deref(), 1, 255)
            .opt_length("metaDescription", self.meta_description.as_deref(), 0, 500);
        if let Some(tags) = &self.tags {
            v.list_len("tags", tags, 0, MAX_TAGS);
        }
        if let Some(themes) = &self.theological_themes {
            v.list_len("theologicalThemes", themes, 0, MAX_TAGS);
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    pub order_index: Option<i32>,
    pub theological_discipline: Option<String>,
    pub movement_relevance_score: Option<i32>,
    pub apest_relevance: Option<Value>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Validate for CreateCategoryRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.length("name", &self.name, 1, 100)
            .slug("slug", &self.slug)
            .opt_length("description", self.description.as_deref(), 0, 1000)
            .range_i64("orderIndex", self.order_index.map(i64::from), 0, 10_000)
            .opt_length("theologicalDiscipline", self.theological_discipline.as_deref(), 1, 32)
            .range_i64("movementRelevanceScore", self.movement_relevance_score.map(i64::from), 1, 10)
            .list_len("keywords", &self.keywords, 0, MAX_TAGS);
        if let Some(rel) = &self.apest_relevance {
            if !rel.is_object() {
                v.fail("apestRelevance", "must be an object", "invalid_type");
            }
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilters {
    pub search: Option<String>,
    pub content_type: Option<ContentType>,
    pub status: Option<ContentStatus>,
    pub visibility: Option<ContentVisibility>,
    pub category_id: Option<Uuid>,
    pub author_id: Option<Uuid>,
    pub series_id: Option<Uuid>,
}

impl ContentFilters {
    /// Listing shows published items unless another status is asked for.
    pub fn status_or_default(&self) -> ContentStatus {
        self.status.unwrap_or(ContentStatus::Published)
    }
}

impl Validate for ContentFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("search", self.search.as_deref(), 0, 100);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author_id: Uuid,
    pub co_authors: Vec<Uuid>,
    pub content_type: ContentType,
    pub format: ContentFormat,
    pub word_count: i32,
    pub estimated_reading_time: i32,
    pub view_count: i32,
    pub like_count: i32,
    pub share_count: i32,
    pub comment_count: i32,
    pub bookmark_count: i32,
    pub primary_category_id: Option<Uuid>,
    pub tags: Vec<String>,
    pub theological_themes: Vec<String>,
    pub series_id: Option<Uuid>,
    pub series_order: Option<i32>,
    pub visibility: ContentVisibility,
    pub status: ContentStatus,
    pub network_amplification_score: f64,
    pub featured_image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub license_type: ContentLicense,
    pub attribution_required: bool,
    pub published_at: Option<String>,
    pub scheduled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub author: Option<AuthorSummary>,
    pub category: Option<CategorySummary>,
    pub is_published: bool,
    pub reading_time_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent_id: Option<Uuid>,
    pub order_index: i32,
    pub theological_discipline: Option<String>,
    pub movement_relevance_score: i32,
    pub apest_relevance: Value,
    pub keywords: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduled_content_needs_a_date() {
        let req: CreateContentRequest = serde_json::from_value(serde_json::json!({
            "title": "Movement Thinking",
            "slug": "movement-thinking",
            "contentType": "article",
            "status": "scheduled"
        }))
        .unwrap();
        assert_eq!(req.validate().unwrap_err().fields(), vec!["scheduledAt"]);
    }

    #[test]
    fn filter_status_defaults_to_published() {
        assert_eq!(ContentFilters::default().status_or_default(), ContentStatus::Published);
        let f = ContentFilters { status: Some(ContentStatus::Draft), ..Default::default() };
        assert_eq!(f.status_or_default(), ContentStatus::Draft);
    }

    #[test]
    fn category_relevance_must_be_an_object() {
        let req = CreateCategoryRequest {
            name: "Leadership".into(),
            slug: "leadership".into(),
            description: None,
            parent_id: None,
            order_index: None,
            theological_discipline: None,
            movement_relevance_score: Some(11),
            apest_relevance: Some(serde_json::json!([1, 2])),
            keywords: vec![],
        };
        assert_eq!(req.validate().unwrap_err().fields(), vec!["movementRelevanceScore", "apestRelevance"]);
    }
}
