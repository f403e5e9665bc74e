//! Organizations and their memberships, as free functions over the database.
use std::collections::HashMap;

use chrono::Utc;
use contracts::organizations::{
    CreateOrganizationRequest, InviteMemberRequest, MemberFilters, MembershipResponse, OrganizationFilters,
    OrganizationResponse, UpdateOrganizationRequest,
};
use contracts::{PageRequest, PaginatedResponse, Validate};
use models::enums::{LicenseType, MembershipRole, MembershipStatus, OrganizationStatus};
use models::json::StringList;
use models::{organization, organization_membership, user_profile};
use sea_orm::sea_query::{Expr, NullOrdering};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::mappers::organizations::{to_membership, to_organization};
use crate::pagination::{apply_sort, fetch_page, search_any};

const ENTITY: &str = "Organization";

fn sort_column(sort: &str) -> Option<organization::Column> {
    match sort {
        "createdAt" => Some(organization::Column::CreatedAt),
        "updatedAt" => Some(organization::Column::UpdatedAt),
        "name" => Some(organization::Column::Name),
        _ => None,
    }
}

#[derive(Debug, FromQueryResult)]
struct MemberCount {
    organization_id: Uuid,
    members: i64,
}

/// Active member counts keyed by organization.
async fn active_member_counts<C: ConnectionTrait>(db: &C, ids: Vec<Uuid>) -> Result<HashMap<Uuid, u64>, ServiceError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    use organization_membership::Column;
    let rows = organization_membership::Entity::find()
        .select_only()
        .column(Column::OrganizationId)
        .column_as(Expr::col(Column::Id).count(), "members")
        .filter(Column::OrganizationId.is_in(ids))
        .filter(Column::Status.eq(MembershipStatus::Active))
        .group_by(Column::OrganizationId)
        .into_model::<MemberCount>()
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| (r.organization_id, r.members.max(0) as u64)).collect())
}

async fn active_membership<C: ConnectionTrait>(
    db: &C,
    organization_id: Uuid,
    user_id: Uuid,
) -> Result<Option<organization_membership::Model>, ServiceError> {
    Ok(organization_membership::find_for_user(db, organization_id, user_id).await?.filter(|m| m.is_active()))
}

async fn require_manager<C: ConnectionTrait>(db: &C, organization_id: Uuid, actor: Uuid) -> Result<(), ServiceError> {
    match active_membership(db, organization_id, actor).await? {
        Some(m) if m.role.can_manage() => Ok(()),
        _ => Err(ServiceError::insufficient_permissions()),
    }
}

async fn find_org<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<organization::Model, ServiceError> {
    organization::Entity::find_by_id(id).one(db).await?.ok_or(ServiceError::not_found(ENTITY, id))
}

#[instrument(skip(db, filters))]
pub async fn list(
    db: &DatabaseConnection,
    filters: &OrganizationFilters,
    page: &PageRequest,
) -> Result<PaginatedResponse<OrganizationResponse>, ServiceError> {
    filters.validate()?;
    use organization::Column;
    let mut select = organization::Entity::find();
    if let Some(term) = filters.search.as_deref().filter(|s| !s.trim().is_empty()) {
        select = select.filter(search_any(&[Column::Name, Column::Description], term));
    }
    if let Some(t) = filters.organization_type {
        select = select.filter(Column::OrganizationType.eq(t));
    }
    if let Some(s) = filters.status {
        select = select.filter(Column::Status.eq(s));
    }
    let select = apply_sort(select, page, sort_column, Column::CreatedAt);
    let (rows, total) = fetch_page(db, select, page).await?;
    let counts = active_member_counts(db, rows.iter().map(|o| o.id).collect()).await?;
    let data = rows
        .into_iter()
        .map(|o| {
            let count = counts.get(&o.id).copied().unwrap_or(0);
            to_organization(o, count)
        })
        .collect();
    Ok(PaginatedResponse::new(data, page, total))
}

/// Creates the organization and its owner membership in one transaction.
#[instrument(skip(db, req), fields(slug = %req.slug))]
pub async fn create(db: &DatabaseConnection, owner: Uuid, req: CreateOrganizationRequest) -> Result<OrganizationResponse, ServiceError> {
    req.validate()?;
    if organization::slug_exists(db, &req.slug).await? {
        return Err(ServiceError::Conflict("Organization with this slug already exists".into()));
    }
    let now = Utc::now().fixed_offset();
    let org = organization::Model {
        id: Uuid::new_v4(),
        name: req.name,
        slug: req.slug,
        description: req.description,
        website: req.website,
        logo_url: req.logo_url,
        organization_type: req.organization_type,
        size_category: req.size_category,
        contact_email: req.contact_email,
        contact_phone: req.contact_phone,
        address: req.address,
        license_type: req.license_type.unwrap_or(LicenseType::Individual),
        max_users: req.max_users.unwrap_or(1),
        billing_email: req.billing_email,
        account_owner_id: Some(owner),
        status: OrganizationStatus::Trial,
        created_at: now,
        updated_at: now,
    };
    let membership = organization_membership::Model {
        id: Uuid::new_v4(),
        user_id: owner,
        organization_id: org.id,
        role: MembershipRole::Owner,
        permissions: StringList::default(),
        status: MembershipStatus::Active,
        joined_at: Some(now),
        invited_at: None,
        invited_by: None,
        created_at: now,
        updated_at: now,
    };

    let txn = db.begin().await?;
    let created = org.into_active_model().reset_all().insert(&txn).await?;
    membership.into_active_model().reset_all().insert(&txn).await?;
    txn.commit().await?;

    info!(event = "organization_created", organization_id = %created.id, owner_id = %owner);
    Ok(to_organization(created, 1))
}

#[instrument(skip(db))]
pub async fn get(db: &DatabaseConnection, id: Uuid) -> Result<OrganizationResponse, ServiceError> {
    let org = find_org(db, id).await?;
    let count = active_member_counts(db, vec![id]).await?.get(&id).copied().unwrap_or(0);
    Ok(to_organization(org, count))
}

/// Owners and admins only.
#[instrument(skip(db, req))]
pub async fn update(
    db: &DatabaseConnection,
    actor: Uuid,
    id: Uuid,
    req: UpdateOrganizationRequest,
) -> Result<OrganizationResponse, ServiceError> {
    req.validate()?;
    let mut org = find_org(db, id).await?;
    require_manager(db, id, actor).await?;

    macro_rules! assign {
        ($($field:ident),+ $(,)?) => {
            $(if let Some(v) = req.$field { org.$field = v; })+
        };
    }
    macro_rules! assign_opt {
        ($($field:ident),+ $(,)?) => {
            $(if let Some(v) = req.$field { org.$field = Some(v); })+
        };
    }
    assign!(name, organization_type, license_type, max_users, status);
    assign_opt!(description, website, logo_url, size_category, contact_email, contact_phone, address, billing_email);
    org.updated_at = Utc::now().fixed_offset();

    let updated = org.into_active_model().reset_all().update(db).await?;
    let count = active_member_counts(db, vec![id]).await?.get(&id).copied().unwrap_or(0);
    info!(event = "organization_updated", organization_id = %id, actor_id = %actor);
    Ok(to_organization(updated, count))
}

/// Visible to active members of the organization.
#[instrument(skip(db, filters))]
pub async fn list_members(
    db: &DatabaseConnection,
    actor: Uuid,
    organization_id: Uuid,
    filters: &MemberFilters,
    page: &PageRequest,
) -> Result<PaginatedResponse<MembershipResponse>, ServiceError> {
    if active_membership(db, organization_id, actor).await?.is_none() {
        return Err(ServiceError::access_denied());
    }
    use organization_membership::Column;
    let mut select = organization_membership::Entity::find().filter(Column::OrganizationId.eq(organization_id));
    if let Some(role) = filters.role {
        select = select.filter(Column::Role.eq(role));
    }
    if let Some(status) = filters.status {
        select = select.filter(Column::Status.eq(status));
    }
    let paginator = select
        .order_by_with_nulls(Column::JoinedAt, sea_orm::Order::Desc, NullOrdering::Last)
        .find_also_related(user_profile::Entity)
        .paginate(db, page.limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.index()).await?;
    let data = rows.into_iter().map(|(m, u)| to_membership(m, u.as_ref())).collect();
    Ok(PaginatedResponse::new(data, page, total))
}

/// Invites an existing user by email; the membership starts as `invited`.
#[instrument(skip(db, req))]
pub async fn invite_member(
    db: &DatabaseConnection,
    actor: Uuid,
    organization_id: Uuid,
    req: InviteMemberRequest,
) -> Result<MembershipResponse, ServiceError> {
    req.validate()?;
    find_org(db, organization_id).await?;
    require_manager(db, organization_id, actor).await?;

    let invitee = user_profile::find_by_email(db, req.email.trim())
        .await?
        .ok_or_else(|| ServiceError::Missing("User not found".into()))?;
    if organization_membership::find_for_user(db, organization_id, invitee.id).await?.is_some() {
        return Err(ServiceError::Conflict("User is already a member of this organization".into()));
    }

    let now = Utc::now().fixed_offset();
    let membership = organization_membership::Model {
        id: Uuid::new_v4(),
        user_id: invitee.id,
        organization_id,
        role: req.role_or_default(),
        permissions: StringList::default(),
        status: MembershipStatus::Invited,
        joined_at: None,
        invited_at: Some(now),
        invited_by: Some(actor),
        created_at: now,
        updated_at: now,
    };
    let created = membership.into_active_model().reset_all().insert(db).await?;
    info!(event = "member_invited", organization_id = %organization_id, user_id = %invitee.id, role = %created.role);
    Ok(to_membership(created, Some(&invitee)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_user};

    fn create_req(slug: &str) -> CreateOrganizationRequest {
        serde_json::from_value(serde_json::json!({
            "name": "Harbour Church",
            "slug": slug,
            "organizationType": "church"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn organization_lifecycle() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let owner = seed_user(&db, "owner").await?;
        let other = seed_user(&db, "other").await?;

        let slug = format!("harbour-{}", Uuid::new_v4().simple());
        let org = create(&db, owner.id, create_req(&slug)).await?;
        assert_eq!(org.member_count, 1);
        assert!(org.is_trial);
        assert_eq!(org.account_owner_id, Some(owner.id));
        assert!(matches!(create(&db, owner.id, create_req(&slug)).await, Err(ServiceError::Conflict(_))));

        let req = UpdateOrganizationRequest { website: Some("https://harbour.example".into()), ..Default::default() };
        let err = update(&db, other.id, org.id, req.clone()).await.unwrap_err();
        assert_eq!(err.public_message(), "Insufficient permissions");
        assert!(update(&db, owner.id, org.id, req).await?.has_website);

        let invite = InviteMemberRequest { email: other.email.clone(), role: None };
        let m = invite_member(&db, owner.id, org.id, invite.clone()).await?;
        assert_eq!(m.status, MembershipStatus::Invited);
        assert_eq!(m.invited_by, Some(owner.id));
        let err = invite_member(&db, owner.id, org.id, invite).await.unwrap_err();
        assert_eq!(err.public_message(), "User is already a member of this organization");
        let missing = InviteMemberRequest { email: "nobody@nowhere.org".into(), role: None };
        assert_eq!(invite_member(&db, owner.id, org.id, missing).await.unwrap_err().public_message(), "User not found");

        // invited members are not active yet
        let err = list_members(&db, other.id, org.id, &MemberFilters::default(), &PageRequest::default()).await.unwrap_err();
        assert_eq!(err.public_message(), "Access denied");
        let members = list_members(&db, owner.id, org.id, &MemberFilters::default(), &PageRequest::default()).await?;
        assert_eq!(members.pagination.total, 2);
        assert_eq!(members.data[0].user_id, owner.id);

        assert_eq!(get(&db, org.id).await?.member_count, 1);
        let err = get(&db, Uuid::nil()).await.unwrap_err();
        assert_eq!(err.public_message(), format!("Organization with ID {} not found", Uuid::nil()));
        Ok(())
    }
}
