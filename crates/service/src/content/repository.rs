use async_trait::async_trait;
use contracts::content::ContentFilters;
use contracts::PageRequest;
use models::{content_category, content_item, user_profile};
use uuid::Uuid;

use crate::errors::ServiceError;

/// A content item with its author and primary category, when they exist.
pub type ContentRow = (content_item::Model, Option<user_profile::Model>, Option<content_category::Model>);

#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn list(&self, filters: &ContentFilters, page: &PageRequest) -> Result<(Vec<ContentRow>, u64), ServiceError>;
    async fn find(&self, id: Uuid) -> Result<Option<ContentRow>, ServiceError>;
    async fn increment_views(&self, id: Uuid) -> Result<(), ServiceError>;
    async fn insert(&self, item: content_item::Model) -> Result<content_item::Model, ServiceError>;
    async fn update(&self, item: content_item::Model) -> Result<content_item::Model, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
    /// Active categories ordered by `order_index`, then name.
    async fn list_categories(&self) -> Result<Vec<content_category::Model>, ServiceError>;
    async fn insert_category(&self, category: content_category::Model) -> Result<content_category::Model, ServiceError>;
}

pub mod mock {
    use super::*;
    use crate::errors::unique_violation;
    use crate::pagination::{matches_search, slice_page};
    use contracts::SortOrder;
    use std::cmp::Ordering;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Store {
        items: HashMap<Uuid, content_item::Model>,
        authors: HashMap<Uuid, user_profile::Model>,
        categories: HashMap<Uuid, content_category::Model>,
    }

    impl Store {
        fn row(&self, item: &content_item::Model) -> ContentRow {
            let author = self.authors.get(&item.author_id).cloned();
            let category = item.primary_category_id.and_then(|id| self.categories.get(&id).cloned());
            (item.clone(), author, category)
        }
    }

    #[derive(Default)]
    pub struct MockContentRepository {
        store: Mutex<Store>,
    }

    impl MockContentRepository {
        pub fn with(authors: Vec<user_profile::Model>, categories: Vec<content_category::Model>) -> Self {
            let repo = Self::default();
            if let Ok(mut s) = repo.store.lock() {
                s.authors.extend(authors.into_iter().map(|a| (a.id, a)));
                s.categories.extend(categories.into_iter().map(|c| (c.id, c)));
            }
            repo
        }
    }

    fn lock_err() -> ServiceError {
        ServiceError::Internal("content store poisoned".into())
    }

    fn compare(a: &content_item::Model, b: &content_item::Model, sort: Option<&str>) -> Ordering {
        match sort {
            Some("createdAt") => a.created_at.cmp(&b.created_at),
            Some("viewCount") => a.view_count.cmp(&b.view_count),
            Some("title") => a.title.cmp(&b.title),
            // unpublished rows sort last in descending order
            _ => a.published_at.cmp(&b.published_at),
        }
    }

    #[async_trait]
    impl ContentRepository for MockContentRepository {
        async fn list(&self, filters: &ContentFilters, page: &PageRequest) -> Result<(Vec<ContentRow>, u64), ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            let status = filters.status_or_default();
            let mut items: Vec<&content_item::Model> = s
                .items
                .values()
                .filter(|c| c.status == status)
                .filter(|c| {
                    filters.search.as_deref().map_or(true, |t| {
                        matches_search(t, &[Some(&c.title), c.excerpt.as_deref(), c.content.as_deref()])
                    })
                })
                .filter(|c| filters.content_type.map_or(true, |t| c.content_type == t))
                .filter(|c| filters.visibility.map_or(true, |v| c.visibility == v))
                .filter(|c| filters.category_id.map_or(true, |id| c.primary_category_id == Some(id)))
                .filter(|c| filters.author_id.map_or(true, |id| c.author_id == id))
                .filter(|c| filters.series_id.map_or(true, |id| c.series_id == Some(id)))
                .collect();
            items.sort_by(|a, b| {
                let ord = compare(a, b, page.sort.as_deref());
                match page.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
            let total = items.len() as u64;
            let rows: Vec<ContentRow> = items.into_iter().map(|c| s.row(c)).collect();
            Ok((slice_page(&rows, page), total))
        }

        async fn find(&self, id: Uuid) -> Result<Option<ContentRow>, ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            Ok(s.items.get(&id).map(|c| s.row(c)))
        }

        async fn increment_views(&self, id: Uuid) -> Result<(), ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            if let Some(c) = s.items.get_mut(&id) {
                c.view_count += 1;
            }
            Ok(())
        }

        async fn insert(&self, item: content_item::Model) -> Result<content_item::Model, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            if s.items.values().any(|c| c.slug == item.slug) {
                return Err(unique_violation("content_items_slug_key"));
            }
            if !s.authors.contains_key(&item.author_id) {
                return Err(ServiceError::ForeignKey("content_items_author_id_fkey".into()));
            }
            s.items.insert(item.id, item.clone());
            Ok(item)
        }

        async fn update(&self, item: content_item::Model) -> Result<content_item::Model, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            match s.items.get_mut(&item.id) {
                Some(row) => {
                    *row = item.clone();
                    Ok(item)
                }
                None => Err(ServiceError::not_found("Content", item.id)),
            }
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.store.lock().map_err(|_| lock_err())?.items.remove(&id).is_some())
        }

        async fn list_categories(&self) -> Result<Vec<content_category::Model>, ServiceError> {
            let s = self.store.lock().map_err(|_| lock_err())?;
            let mut cats: Vec<_> = s.categories.values().filter(|c| c.is_active).cloned().collect();
            cats.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.name.cmp(&b.name)));
            Ok(cats)
        }

        async fn insert_category(&self, category: content_category::Model) -> Result<content_category::Model, ServiceError> {
            let mut s = self.store.lock().map_err(|_| lock_err())?;
            if s.categories.values().any(|c| c.slug == category.slug) {
                return Err(unique_violation("content_categories_slug_key"));
            }
            s.categories.insert(category.id, category.clone());
            Ok(category)
        }
    }
}
