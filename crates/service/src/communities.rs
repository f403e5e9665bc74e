use chrono::Utc;
use contracts::communities::{CommunityFilters, CommunityMembershipResponse, CommunityResponse, CreateCommunityRequest};
use contracts::{PageRequest, PaginatedResponse, Validate};
use models::enums::{CommunityMemberStatus, CommunityRole, CommunityVisibility, CulturalContext, ModerationLevel};
use models::{community, community_membership};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QuerySelect,
    TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::mappers::communities::{to_community, to_community_membership};
use crate::pagination::{apply_sort, fetch_page, search_any};

fn sort_column(sort: &str) -> Option<community::Column> {
    match sort {
        "createdAt" => Some(community::Column::CreatedAt),
        "name" => Some(community::Column::Name),
        "currentMemberCount" => Some(community::Column::CurrentMemberCount),
        _ => None,
    }
}

/// Active communities only.
#[instrument(skip(db, filters))]
pub async fn list(
    db: &DatabaseConnection,
    filters: &CommunityFilters,
    page: &PageRequest,
) -> Result<PaginatedResponse<CommunityResponse>, ServiceError> {
    filters.validate()?;
    use community::Column;
    let mut select = community::Entity::find().filter(Column::IsActive.eq(true));
    if let Some(term) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
        select = select.filter(search_any(&[Column::Name, Column::Description], term));
    }
    if let Some(t) = filters.community_type {
        select = select.filter(Column::CommunityType.eq(t));
    }
    if let Some(v) = filters.visibility {
        select = select.filter(Column::Visibility.eq(v));
    }
    let select = apply_sort(select, page, sort_column, Column::CreatedAt);
    let (rows, total) = fetch_page(db, select, page).await?;
    Ok(PaginatedResponse::new(rows.into_iter().map(to_community).collect(), page, total))
}

#[instrument(skip(db, req), fields(slug = %req.slug))]
pub async fn create(db: &DatabaseConnection, creator: Uuid, req: CreateCommunityRequest) -> Result<CommunityResponse, ServiceError> {
    req.validate()?;
    let now = Utc::now().fixed_offset();
    let c = community::Model {
        id: Uuid::new_v4(),
        name: req.name,
        slug: req.slug,
        description: req.description,
        community_type: req.community_type,
        cultural_context: req.cultural_context.unwrap_or(CulturalContext::Global),
        visibility: req.visibility.unwrap_or(CommunityVisibility::Public),
        join_approval_required: req.join_approval_required.unwrap_or(false),
        max_members: req.max_members,
        moderation_level: req.moderation_level.unwrap_or(ModerationLevel::Moderated),
        current_member_count: 1,
        created_by: creator,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let owner = community_membership::Model {
        id: Uuid::new_v4(),
        user_id: creator,
        community_id: c.id,
        role: CommunityRole::Owner,
        status: CommunityMemberStatus::Active,
        joined_at: now,
        created_at: now,
        updated_at: now,
    };

    let txn = db.begin().await?;
    let created = c.into_active_model().reset_all().insert(&txn).await?;
    owner.into_active_model().reset_all().insert(&txn).await?;
    txn.commit().await?;

    info!(event = "community_created", community_id = %created.id, creator_id = %creator);
    Ok(to_community(created))
}

/// Joins a community. Approval-gated communities leave the membership pending
/// and do not count it until approved.
#[instrument(skip(db))]
pub async fn join(db: &DatabaseConnection, user_id: Uuid, community_id: Uuid) -> Result<CommunityMembershipResponse, ServiceError> {
    let txn = db.begin().await?;
    // row lock serializes concurrent joins so the capacity check holds
    let c = community::Entity::find_by_id(community_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .filter(|c| c.is_active)
        .ok_or(ServiceError::not_found("Community", community_id))?;

    let existing = community_membership::Entity::find()
        .filter(community_membership::Column::CommunityId.eq(community_id))
        .filter(community_membership::Column::UserId.eq(user_id))
        .one(&txn)
        .await?;
    if matches!(&existing, Some(m) if m.status != CommunityMemberStatus::Left) {
        return Err(ServiceError::Conflict("Already a member of this community".into()));
    }
    if c.is_full() {
        return Err(ServiceError::Conflict("Community is full".into()));
    }

    let now = Utc::now().fixed_offset();
    let status = if c.join_approval_required { CommunityMemberStatus::Pending } else { CommunityMemberStatus::Active };

    let membership = match existing {
        // rejoining reuses the row kept for the (user, community) pair
        Some(mut m) => {
            m.role = CommunityRole::Member;
            m.status = status;
            m.joined_at = now;
            m.updated_at = now;
            m.into_active_model().reset_all().update(&txn).await?
        }
        None => {
            community_membership::Model {
                id: Uuid::new_v4(),
                user_id,
                community_id,
                role: CommunityRole::Member,
                status,
                joined_at: now,
                created_at: now,
                updated_at: now,
            }
            .into_active_model()
            .reset_all()
            .insert(&txn)
            .await?
        }
    };
    if status == CommunityMemberStatus::Active {
        community::Entity::update_many()
            .col_expr(community::Column::CurrentMemberCount, Expr::col(community::Column::CurrentMemberCount).add(1))
            .col_expr(community::Column::UpdatedAt, Expr::value(now))
            .filter(community::Column::Id.eq(community_id))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;

    info!(event = "community_joined", community_id = %community_id, user_id = %user_id, status = %status);
    Ok(to_community_membership(membership))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_user};

    fn create_req(slug: &str, max: Option<i32>, approval: bool) -> CreateCommunityRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Planters Cohort",
            "slug": slug,
            "communityType": "church_planting_cohort",
            "maxMembers": max,
            "joinApprovalRequired": approval
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn join_rules() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let creator = seed_user(&db, "creator").await?;
        let a = seed_user(&db, "a").await?;
        let b = seed_user(&db, "b").await?;

        let small = create(&db, creator.id, create_req(&format!("small-{}", Uuid::new_v4().simple()), Some(2), false)).await?;
        assert_eq!(small.current_member_count, 1);

        let m = join(&db, a.id, small.id).await?;
        assert_eq!(m.status, CommunityMemberStatus::Active);
        let err = join(&db, a.id, small.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(join(&db, b.id, small.id).await.unwrap_err().public_message(), "Community is full");

        let gated = create(&db, creator.id, create_req(&format!("gated-{}", Uuid::new_v4().simple()), None, true)).await?;
        let m = join(&db, b.id, gated.id).await?;
        assert_eq!(m.status, CommunityMemberStatus::Pending);
        let after = community::Entity::find_by_id(gated.id).one(&db).await?.map(|c| c.current_member_count);
        assert_eq!(after, Some(1));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_joins_respect_capacity() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let creator = seed_user(&db, "cap-creator").await?;
        let a = seed_user(&db, "cap-a").await?;
        let b = seed_user(&db, "cap-b").await?;
        let c = seed_user(&db, "cap-c").await?;

        // one seat left after the creator
        let small = create(&db, creator.id, create_req(&format!("cap-{}", Uuid::new_v4().simple()), Some(2), false)).await?;
        let (ra, rb, rc) = tokio::join!(join(&db, a.id, small.id), join(&db, b.id, small.id), join(&db, c.id, small.id));
        let joined = [ra.is_ok(), rb.is_ok(), rc.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(joined, 1);

        let count = community::Entity::find_by_id(small.id).one(&db).await?.map(|c| c.current_member_count);
        assert_eq!(count, Some(2));
        Ok(())
    }
}
