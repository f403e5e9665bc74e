use std::collections::HashMap;

use async_trait::async_trait;
use contracts::content::ContentFilters;
use contracts::PageRequest;
use models::content_item::{Column, Entity};
use models::{content_category, content_item, user_profile};
use sea_orm::sea_query::{Expr, NullOrdering};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::repository::{ContentRepository, ContentRow};
use crate::errors::ServiceError;
use crate::pagination::{order_of, search_any};

pub struct SeaOrmContentRepository {
    pub db: DatabaseConnection,
}

fn sort_column(sort: &str) -> Option<Column> {
    match sort {
        "publishedAt" => Some(Column::PublishedAt),
        "createdAt" => Some(Column::CreatedAt),
        "viewCount" => Some(Column::ViewCount),
        "title" => Some(Column::Title),
        _ => None,
    }
}

impl SeaOrmContentRepository {
    /// Attaches primary categories in one query.
    async fn with_categories(
        &self,
        rows: Vec<(content_item::Model, Option<user_profile::Model>)>,
    ) -> Result<Vec<ContentRow>, ServiceError> {
        let ids: Vec<Uuid> = rows.iter().filter_map(|(c, _)| c.primary_category_id).collect();
        let categories: HashMap<Uuid, content_category::Model> = if ids.is_empty() {
            HashMap::new()
        } else {
            content_category::Entity::find()
                .filter(content_category::Column::Id.is_in(ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect()
        };
        Ok(rows
            .into_iter()
            .map(|(c, author)| {
                let category = c.primary_category_id.and_then(|id| categories.get(&id).cloned());
                (c, author, category)
            })
            .collect())
    }
}

#[async_trait]
impl ContentRepository for SeaOrmContentRepository {
    async fn list(&self, filters: &ContentFilters, page: &PageRequest) -> Result<(Vec<ContentRow>, u64), ServiceError> {
        let mut select = Entity::find().filter(Column::Status.eq(filters.status_or_default()));
        if let Some(term) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            select = select.filter(search_any(&[Column::Title, Column::Excerpt, Column::Content], term));
        }
        if let Some(t) = filters.content_type {
            select = select.filter(Column::ContentType.eq(t));
        }
        if let Some(v) = filters.visibility {
            select = select.filter(Column::Visibility.eq(v));
        }
        if let Some(id) = filters.category_id {
            select = select.filter(Column::PrimaryCategoryId.eq(id));
        }
        if let Some(id) = filters.author_id {
            select = select.filter(Column::AuthorId.eq(id));
        }
        if let Some(id) = filters.series_id {
            select = select.filter(Column::SeriesId.eq(id));
        }
        let col = page.sort.as_deref().and_then(sort_column).unwrap_or(Column::PublishedAt);
        let select = select.order_by_with_nulls(col, order_of(page.order), NullOrdering::Last);

        let paginator = select.find_also_related(user_profile::Entity).paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;
        Ok((self.with_categories(rows).await?, total))
    }

    async fn find(&self, id: Uuid) -> Result<Option<ContentRow>, ServiceError> {
        let Some(row) = Entity::find_by_id(id).find_also_related(user_profile::Entity).one(&self.db).await? else {
            return Ok(None);
        };
        Ok(self.with_categories(vec![row]).await?.pop())
    }

    async fn increment_views(&self, id: Uuid) -> Result<(), ServiceError> {
        Entity::update_many()
            .col_expr(Column::ViewCount, Expr::col(Column::ViewCount).add(1))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn insert(&self, item: content_item::Model) -> Result<content_item::Model, ServiceError> {
        Ok(item.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update(&self, item: content_item::Model) -> Result<content_item::Model, ServiceError> {
        Ok(item.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(Entity::delete_by_id(id).exec(&self.db).await?.rows_affected > 0)
    }

    async fn list_categories(&self) -> Result<Vec<content_category::Model>, ServiceError> {
        Ok(content_category::Entity::find()
            .filter(content_category::Column::IsActive.eq(true))
            .order_by_asc(content_category::Column::OrderIndex)
            .order_by_asc(content_category::Column::Name)
            .all(&self.db)
            .await?)
    }

    async fn insert_category(&self, category: content_category::Model) -> Result<content_category::Model, ServiceError> {
        Ok(category.into_active_model().reset_all().insert(&self.db).await?)
    }
}
