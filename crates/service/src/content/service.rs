use std::sync::Arc;

use chrono::Utc;
use contracts::content::{
    CategoryResponse, ContentFilters, ContentItemResponse, CreateCategoryRequest, CreateContentRequest,
    UpdateContentRequest,
};
use contracts::{PageRequest, PaginatedResponse, Validate};
use models::enums::{ContentFormat, ContentLicense, ContentStatus, ContentVisibility};
use models::{content_category, content_item};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repository::ContentRepository;
use crate::errors::ServiceError;
use crate::mappers::content::{to_category, to_content_item};

const ENTITY: &str = "Content";
const WORDS_PER_MINUTE: i32 = 200;

/// Word count and whole minutes of reading time, rounded up.
///
/// ```
/// use service::content::service::reading_stats;
/// assert_eq!(reading_stats("grace and peace to you"), (5, 1));
/// assert_eq!(reading_stats(&"word ".repeat(401)), (401, 3));
/// assert_eq!(reading_stats("   "), (0, 0));
/// ```
pub fn reading_stats(text: &str) -> (i32, i32) {
    let words = i32::try_from(text.split_whitespace().count()).unwrap_or(i32::MAX);
    (words, (words + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE)
}

pub struct ContentService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ContentRepository + ?Sized> ContentService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, filters))]
    pub async fn list(&self, filters: &ContentFilters, page: &PageRequest) -> Result<PaginatedResponse<ContentItemResponse>, ServiceError> {
        filters.validate()?;
        let (rows, total) = self.repo.list(filters, page).await?;
        let data = rows.into_iter().map(|(c, a, cat)| to_content_item(c, a.as_ref(), cat.as_ref())).collect();
        Ok(PaginatedResponse::new(data, page, total))
    }

    /// Fetches an item and counts the view.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<ContentItemResponse, ServiceError> {
        let (mut item, author, category) = self.repo.find(id).await?.ok_or(ServiceError::not_found(ENTITY, id))?;
        self.repo.increment_views(id).await?;
        item.view_count += 1;
        Ok(to_content_item(item, author.as_ref(), category.as_ref()))
    }

    #[instrument(skip(self, req), fields(slug = %req.slug))]
    pub async fn create(&self, author_id: Uuid, req: CreateContentRequest) -> Result<ContentItemResponse, ServiceError> {
        req.validate()?;
        let now = Utc::now().fixed_offset();
        let status = req.status.unwrap_or(ContentStatus::Draft);
        let computed = req.content.as_deref().map(reading_stats);
        let word_count = req.word_count.or(computed.map(|(w, _)| w));
        let estimated_reading_time = req
            .estimated_reading_time
            .or_else(|| word_count.map(|w| (w + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE));

        let item = content_item::Model {
            id: Uuid::new_v4(),
            title: req.title,
            slug: req.slug,
            excerpt: req.excerpt,
            content: req.content,
            author_id,
            co_authors: req.co_authors.into(),
            content_type: req.content_type,
            format: req.format.unwrap_or(ContentFormat::Text),
            word_count,
            estimated_reading_time,
            view_count: 0,
            like_count: 0,
            share_count: 0,
            comment_count: 0,
            bookmark_count: 0,
            primary_category_id: req.primary_category_id,
            tags: req.tags.into(),
            theological_themes: req.theological_themes.into(),
            series_id: req.series_id,
            series_order: req.series_order,
            visibility: req.visibility.unwrap_or(ContentVisibility::Public),
            status,
            network_amplification_score: 0.0,
            featured_image_url: req.featured_image_url,
            video_url: req.video_url,
            audio_url: req.audio_url,
            meta_title: req.meta_title,
            meta_description: req.meta_description,
            license_type: req.license_type.unwrap_or(ContentLicense::AllRightsReserved),
            attribution_required: req.attribution_required.unwrap_or(true),
            published_at: (status == ContentStatus::Published).then_some(now),
            scheduled_at: req.scheduled_at,
            created_at: now,
            updated_at: now,
        };
        let created = self.repo.insert(item).await?;
        info!(event = "content_created", content_id = %created.id, author_id = %author_id, status = %status);
        self.joined(created).await
    }

    /// Only the author may edit.
    #[instrument(skip(self, req))]
    pub async fn update(&self, actor: Uuid, id: Uuid, req: UpdateContentRequest) -> Result<ContentItemResponse, ServiceError> {
        req.validate()?;
        let (mut item, _, _) = self.repo.find(id).await?.ok_or(ServiceError::not_found(ENTITY, id))?;
        if item.author_id != actor {
            return Err(ServiceError::insufficient_permissions());
        }
        let now = Utc::now().fixed_offset();

        macro_rules! assign {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = req.$field { item.$field = v; })+
            };
        }
        macro_rules! assign_opt {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(v) = req.$field { item.$field = Some(v); })+
            };
        }
        assign!(title, content_type, format, visibility, status, license_type, attribution_required);
        assign_opt!(
            excerpt, primary_category_id, series_id, series_order, featured_image_url, video_url, audio_url, meta_title,
            meta_description, scheduled_at,
        );
        if let Some(text) = req.content {
            let (words, minutes) = reading_stats(&text);
            item.word_count = Some(words);
            item.estimated_reading_time = Some(minutes);
            item.content = Some(text);
        }
        if let Some(tags) = req.tags {
            item.tags = tags.into();
        }
        if let Some(themes) = req.theological_themes {
            item.theological_themes = themes.into();
        }
        if item.status == ContentStatus::Published && item.published_at.is_none() {
            item.published_at = Some(now);
        }
        item.updated_at = now;

        let updated = self.repo.update(item).await?;
        info!(event = "content_updated", content_id = %updated.id);
        self.joined(updated).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let (item, _, _) = self.repo.find(id).await?.ok_or(ServiceError::not_found(ENTITY, id))?;
        if item.author_id != actor {
            return Err(ServiceError::insufficient_permissions());
        }
        self.repo.delete(id).await?;
        info!(event = "content_deleted", content_id = %id);
        Ok(())
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        Ok(self.repo.list_categories().await?.into_iter().map(to_category).collect())
    }

    #[instrument(skip(self, req), fields(slug = %req.slug))]
    pub async fn create_category(&self, req: CreateCategoryRequest) -> Result<CategoryResponse, ServiceError> {
        req.validate()?;
        let now = Utc::now().fixed_offset();
        let category = content_category::Model {
            id: Uuid::new_v4(),
            name: req.name,
            slug: req.slug,
            description: req.description,
            parent_id: req.parent_id,
            order_index: req.order_index.unwrap_or(0),
            theological_discipline: req.theological_discipline,
            movement_relevance_score: req.movement_relevance_score.unwrap_or(5),
            apest_relevance: req.apest_relevance,
            keywords: req.keywords.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let created = self.repo.insert_category(category).await?;
        info!(event = "category_created", category_id = %created.id);
        Ok(to_category(created))
    }

    async fn joined(&self, item: content_item::Model) -> Result<ContentItemResponse, ServiceError> {
        match self.repo.find(item.id).await? {
            Some((c, author, category)) => Ok(to_content_item(c, author.as_ref(), category.as_ref())),
            None => Ok(to_content_item(item, None, None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::repository::mock::MockContentRepository;
    use crate::mappers::fixtures;
    use models::user_profile;

    fn setup() -> (ContentService<MockContentRepository>, user_profile::Model, content_category::Model) {
        let author = fixtures::user("writer@church.org");
        let cat = fixtures::category("Leadership", 1);
        let repo = MockContentRepository::with(vec![author.clone()], vec![cat.clone()]);
        (ContentService::new(Arc::new(repo)), author, cat)
    }

    fn create_req(slug: &str, status: &str, body: &str) -> CreateContentRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Planting in the City",
            "slug": slug,
            "content": body,
            "contentType": "article",
            "status": status
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_computes_reading_time_and_publish_date() {
        let (svc, author, cat) = setup();
        let mut req = create_req("planting-city", "published", &"word ".repeat(450));
        req.primary_category_id = Some(cat.id);
        let item = svc.create(author.id, req).await.unwrap();
        assert_eq!(item.word_count, 450);
        assert_eq!(item.estimated_reading_time, 3);
        assert_eq!(item.reading_time_label, "3 min read");
        assert!(item.is_published && item.published_at.is_some());
        assert_eq!(item.author.map(|a| a.id), Some(author.id));
        assert_eq!(item.category.map(|c| c.slug), Some("leadership".to_string()));

        let err = svc.create(author.id, create_req("planting-city", "draft", "x")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn get_counts_views() {
        let (svc, author, _) = setup();
        let item = svc.create(author.id, create_req("views", "published", "a b c")).await.unwrap();
        assert_eq!(svc.get(item.id).await.unwrap().view_count, 1);
        assert_eq!(svc.get(item.id).await.unwrap().view_count, 2);
        assert!(matches!(svc.get(Uuid::new_v4()).await.unwrap_err(), ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_defaults_to_published() {
        let (svc, author, _) = setup();
        svc.create(author.id, create_req("draft-one", "draft", "draft words")).await.unwrap();
        svc.create(author.id, create_req("live-one", "published", "Mission shaped church")).await.unwrap();

        let out = svc.list(&ContentFilters::default(), &PageRequest::default()).await.unwrap();
        assert_eq!(out.pagination.total, 1);
        assert_eq!(out.data[0].slug, "live-one");

        let drafts = ContentFilters { status: Some(ContentStatus::Draft), ..Default::default() };
        assert_eq!(svc.list(&drafts, &PageRequest::default()).await.unwrap().data[0].slug, "draft-one");

        let search = ContentFilters { search: Some("MISSION".into()), ..Default::default() };
        assert_eq!(svc.list(&search, &PageRequest::default()).await.unwrap().data.len(), 1);
    }

    #[tokio::test]
    async fn only_author_may_edit() {
        let (svc, author, _) = setup();
        let item = svc.create(author.id, create_req("mine", "draft", "one two")).await.unwrap();
        let req = UpdateContentRequest { status: Some(ContentStatus::Published), ..Default::default() };

        let err = svc.update(Uuid::new_v4(), item.id, req.clone()).await.unwrap_err();
        assert_eq!(err.public_message(), "Insufficient permissions");
        assert_eq!(svc.delete(Uuid::new_v4(), item.id).await.unwrap_err().public_message(), "Insufficient permissions");

        let updated = svc.update(author.id, item.id, req).await.unwrap();
        assert!(updated.is_published && updated.published_at.is_some());
        svc.delete(author.id, item.id).await.unwrap();
    }

    #[tokio::test]
    async fn categories_are_ordered() {
        let (svc, _, _) = setup();
        for (name, order) in [("Worship", 0), ("Apologetics", 1)] {
            let req: CreateCategoryRequest =
                serde_json::from_value(serde_json::json!({ "name": name, "slug": name.to_lowercase(), "orderIndex": order })).unwrap();
            svc.create_category(req).await.unwrap();
        }
        let names: Vec<String> = svc.list_categories().await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Worship", "Apologetics", "Leadership"]);
    }
}
