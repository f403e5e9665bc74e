use async_trait::async_trait;
use contracts::assessments::AssessmentFilters;
use contracts::PageRequest;
use models::{assessment, assessment_question, assessment_response, user_assessment};
use sea_orm::sea_query::{Expr, NullOrdering, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Order, PaginatorTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use super::repository::{AssessmentRepository, UserAssessmentRow};
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, order_of, search_any};

pub struct SeaOrmAssessmentRepository {
    pub db: DatabaseConnection,
}

fn sort_column(sort: &str) -> Option<assessment::Column> {
    match sort {
        "publishedAt" => Some(assessment::Column::PublishedAt),
        "createdAt" => Some(assessment::Column::CreatedAt),
        "name" => Some(assessment::Column::Name),
        _ => None,
    }
}

#[async_trait]
impl AssessmentRepository for SeaOrmAssessmentRepository {
    async fn list(&self, filters: &AssessmentFilters, page: &PageRequest) -> Result<(Vec<assessment::Model>, u64), ServiceError> {
        use assessment::Column;
        let mut select = assessment::Entity::find();
        if let Some(term) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
            select = select.filter(search_any(&[Column::Name, Column::Description], term));
        }
        if let Some(t) = filters.assessment_type {
            select = select.filter(Column::AssessmentType.eq(t));
        }
        if let Some(s) = filters.status {
            select = select.filter(Column::Status.eq(s));
        }
        if let Some(l) = filters.language.as_deref() {
            select = select.filter(Column::Language.eq(l));
        }
        if let Some(c) = filters.cultural_adaptation {
            select = select.filter(Column::CulturalAdaptation.eq(c));
        }
        if let Some(r) = filters.research_backed {
            select = select.filter(Column::ResearchBacked.eq(r));
        }
        let select = match page.sort.as_deref().and_then(sort_column) {
            Some(col) => select.order_by_with_nulls(col, order_of(page.order), NullOrdering::Last),
            None => select
                .order_by_with_nulls(Column::PublishedAt, Order::Desc, NullOrdering::Last)
                .order_by_desc(Column::CreatedAt),
        };
        fetch_page(&self.db, select, page).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<assessment::Model>, ServiceError> {
        Ok(assessment::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert(&self, a: assessment::Model) -> Result<assessment::Model, ServiceError> {
        Ok(a.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn questions(&self, assessment_id: Uuid) -> Result<Vec<assessment_question::Model>, ServiceError> {
        Ok(assessment_question::Entity::find()
            .filter(assessment_question::Column::AssessmentId.eq(assessment_id))
            .order_by_asc(assessment_question::Column::OrderIndex)
            .all(&self.db)
            .await?)
    }

    async fn add_question(&self, q: assessment_question::Model) -> Result<assessment_question::Model, ServiceError> {
        let txn = self.db.begin().await?;
        let assessment_id = q.assessment_id;
        let created = q.into_active_model().reset_all().insert(&txn).await?;
        assessment::Entity::update_many()
            .col_expr(assessment::Column::QuestionsCount, Expr::col(assessment::Column::QuestionsCount).add(1))
            .filter(assessment::Column::Id.eq(assessment_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        Ok(created)
    }

    async fn find_in_progress(&self, user_id: Uuid, assessment_id: Uuid) -> Result<Option<user_assessment::Model>, ServiceError> {
        Ok(user_assessment::Entity::find()
            .filter(user_assessment::Column::UserId.eq(user_id))
            .filter(user_assessment::Column::AssessmentId.eq(assessment_id))
            .filter(user_assessment::Column::CompletedAt.is_null())
            .order_by_desc(user_assessment::Column::StartedAt)
            .one(&self.db)
            .await?)
    }

    async fn find_user_assessment(&self, id: Uuid) -> Result<Option<UserAssessmentRow>, ServiceError> {
        Ok(user_assessment::Entity::find_by_id(id)
            .find_also_related(assessment::Entity)
            .one(&self.db)
            .await?)
    }

    async fn list_user_assessments(&self, user_id: Uuid, page: &PageRequest) -> Result<(Vec<UserAssessmentRow>, u64), ServiceError> {
        let paginator = user_assessment::Entity::find()
            .filter(user_assessment::Column::UserId.eq(user_id))
            .find_also_related(assessment::Entity)
            .order_by_desc(user_assessment::Column::StartedAt)
            .paginate(&self.db, page.limit);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.index()).await?;
        Ok((rows, total))
    }

    async fn insert_user_assessment(&self, ua: user_assessment::Model) -> Result<user_assessment::Model, ServiceError> {
        Ok(ua.into_active_model().reset_all().insert(&self.db).await?)
    }

    async fn update_user_assessment(&self, ua: user_assessment::Model) -> Result<user_assessment::Model, ServiceError> {
        Ok(ua.into_active_model().reset_all().update(&self.db).await?)
    }

    async fn delete_user_assessment(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = user_assessment::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn responses(&self, user_assessment_id: Uuid) -> Result<Vec<assessment_response::Model>, ServiceError> {
        Ok(assessment_response::Entity::find()
            .filter(assessment_response::Column::UserAssessmentId.eq(user_assessment_id))
            .all(&self.db)
            .await?)
    }

    async fn upsert_responses(&self, responses: Vec<assessment_response::Model>) -> Result<usize, ServiceError> {
        use assessment_response::Column;
        let n = responses.len();
        if n == 0 {
            return Ok(0);
        }
        let rows = responses.into_iter().map(|r| r.into_active_model().reset_all());
        assessment_response::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([Column::UserAssessmentId, Column::QuestionId])
                    .update_columns([
                        Column::ResponseValue,
                        Column::ResponseText,
                        Column::ResponseTime,
                        Column::Confidence,
                        Column::Skipped,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(n)
    }
}
