use contracts::content::{AuthorSummary, CategoryResponse, CategorySummary, ContentItemResponse};
use models::enums::ContentStatus;
use models::{content_category, content_item, user_profile};
use serde_json::Value;

use super::{opt_ts, ts};

pub fn reading_time_label(minutes: i32) -> String {
    if minutes > 0 {
        format!("{} min read", minutes)
    } else {
        "Quick read".to_string()
    }
}

pub fn to_author(u: &user_profile::Model) -> AuthorSummary {
    AuthorSummary {
        id: u.id,
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        display_name: u.display_name.clone(),
        avatar_url: u.avatar_url.clone(),
    }
}

pub fn to_category_summary(c: &content_category::Model) -> CategorySummary {
    CategorySummary { id: c.id, name: c.name.clone(), slug: c.slug.clone() }
}

pub fn to_content_item(
    c: content_item::Model,
    author: Option<&user_profile::Model>,
    category: Option<&content_category::Model>,
) -> ContentItemResponse {
    let estimated_reading_time = c.estimated_reading_time.unwrap_or(0);
    ContentItemResponse {
        is_published: c.status == ContentStatus::Published,
        reading_time_label: reading_time_label(estimated_reading_time),
        author: author.map(to_author),
        category: category.map(to_category_summary),
        id: c.id,
        title: c.title,
        slug: c.slug,
        excerpt: c.excerpt.unwrap_or_default(),
        content: c.content.unwrap_or_default(),
        author_id: c.author_id,
        co_authors: c.co_authors.0,
        content_type: c.content_type,
        format: c.format,
        word_count: c.word_count.unwrap_or(0),
        estimated_reading_time,
        view_count: c.view_count,
        like_count: c.like_count,
        share_count: c.share_count,
        comment_count: c.comment_count,
        bookmark_count: c.bookmark_count,
        primary_category_id: c.primary_category_id,
        tags: c.tags.into_inner(),
        theological_themes: c.theological_themes.into_inner(),
        series_id: c.series_id,
        series_order: c.series_order,
        visibility: c.visibility,
        status: c.status,
        network_amplification_score: c.network_amplification_score,
        featured_image_url: c.featured_image_url,
        video_url: c.video_url,
        audio_url: c.audio_url,
        meta_title: c.meta_title,
        meta_description: c.meta_description,
        license_type: c.license_type,
        attribution_required: c.attribution_required,
        published_at: opt_ts(&c.published_at),
        scheduled_at: opt_ts(&c.scheduled_at),
        created_at: ts(&c.created_at),
        updated_at: ts(&c.updated_at),
    }
}

pub fn to_category(c: content_category::Model) -> CategoryResponse {
    CategoryResponse {
        id: c.id,
        name: c.name,
        slug: c.slug,
        description: c.description.unwrap_or_default(),
        parent_id: c.parent_id,
        order_index: c.order_index,
        theological_discipline: c.theological_discipline,
        movement_relevance_score: c.movement_relevance_score,
        apest_relevance: c.apest_relevance.filter(Value::is_object).unwrap_or_else(|| Value::Object(Default::default())),
        keywords: c.keywords.into_inner(),
        is_active: c.is_active,
        created_at: ts(&c.created_at),
        updated_at: ts(&c.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::fixtures;

    #[test]
    fn reading_time_labels() {
        assert_eq!(reading_time_label(0), "Quick read");
        assert_eq!(reading_time_label(7), "7 min read");
    }

    #[test]
    fn content_coalesces_and_joins() {
        let author = fixtures::user("writer@church.org");
        let cat = fixtures::category("Leadership", 1);
        let mut item = fixtures::content_item(author.id, ContentStatus::Published);
        item.primary_category_id = Some(cat.id);
        let dto = to_content_item(item, Some(&author), Some(&cat));
        assert_eq!(dto.excerpt, "");
        assert_eq!(dto.content, "");
        assert_eq!(dto.word_count, 0);
        assert!(dto.is_published);
        assert_eq!(dto.reading_time_label, "Quick read");
        assert_eq!(dto.author.map(|a| a.first_name), Some("Ruth".to_string()));
        assert_eq!(dto.category.map(|c| c.slug), Some("leadership".to_string()));
    }

    #[test]
    fn category_relevance_defaults_to_empty_object() {
        let mut c = fixtures::category("Mission", 0);
        c.apest_relevance = Some(serde_json::json!([1]));
        assert_eq!(to_category(c).apest_relevance, serde_json::json!({}));
    }
}
