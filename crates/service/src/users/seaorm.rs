use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use contracts::users::UserFilters;
use contracts::PageRequest;
use models::user_profile::{self, Column, Entity};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter};
use uuid::Uuid;

use super::repository::UserRepository;
use crate::errors::ServiceError;
use crate::pagination::{apply_sort, fetch_page, search_any};

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

fn sort_column(sort: &str) -> Option<Column> {
    match sort {
        "createdAt" => Some(Column::CreatedAt),
        "updatedAt" => Some(Column::UpdatedAt),
        "email" => Some(Column::Email),
        "lastName" => Some(Column::LastName),
        "lastActiveAt" => Some(Column::LastActiveAt),
        _ => None,
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn list(&self, filters: &UserFilters, page: &PageRequest) -> Result<(Vec<user_profile::Model>, u64), ServiceError> {
        let mut select = Entity::find();
        if let Some(term) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            select = select.filter(search_any(&[Column::FirstName, Column::LastName, Column::DisplayName, Column::Email], term));
        }
        if let Some(role) = filters.ministry_role {
            select = select.filter(Column::MinistryRole.eq(role));
        }
        if let Some(status) = filters.account_status {
            select = select.filter(Column::AccountStatus.eq(status));
        }
        if let Some(tier) = filters.subscription_tier {
            select = select.filter(Column::SubscriptionTier.eq(tier));
        }
        if let Some(cc) = filters.country_code.as_deref() {
            select = select.filter(Column::CountryCode.eq(cc));
        }
        let select = apply_sort(select, page, sort_column, Column::CreatedAt);
        fetch_page(&self.db, select, page).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<user_profile::Model>, ServiceError> {
        Ok(Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user_profile::Model>, ServiceError> {
        Ok(user_profile::find_by_email(&self.db, email).await?)
    }

    async fn insert(&self, profile: user_profile::Model) -> Result<user_profile::Model, ServiceError> {
        let am = profile.into_active_model().reset_all();
        Ok(am.insert(&self.db).await?)
    }

    async fn update(&self, profile: user_profile::Model) -> Result<user_profile::Model, ServiceError> {
        let am = profile.into_active_model().reset_all();
        Ok(am.update(&self.db).await?)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn touch_last_active(&self, id: Uuid, at: DateTime<FixedOffset>) -> Result<(), ServiceError> {
        Entity::update_many()
            .col_expr(Column::LastActiveAt, Expr::value(at))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
