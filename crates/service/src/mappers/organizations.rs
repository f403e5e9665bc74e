use contracts::organizations::{MemberUserSummary, MembershipResponse, OrganizationResponse};
use models::enums::OrganizationStatus;
use models::{organization, organization_membership, user_profile};

use super::{opt_ts, ts};

fn present(v: &Option<String>) -> bool {
    v.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

pub fn to_organization(o: organization::Model, member_count: u64) -> OrganizationResponse {
    OrganizationResponse {
        is_active: o.status == OrganizationStatus::Active,
        is_trial: o.status == OrganizationStatus::Trial,
        has_custom_logo: present(&o.logo_url),
        has_website: present(&o.website),
        member_count,
        display_name: o.name.clone(),
        status_display: o.status.display().to_string(),
        license_type_display: o.license_type.display().to_string(),
        id: o.id,
        name: o.name,
        slug: o.slug,
        description: o.description,
        website: o.website,
        logo_url: o.logo_url,
        organization_type: o.organization_type,
        size_category: o.size_category,
        contact_email: o.contact_email,
        contact_phone: o.contact_phone,
        address: o.address,
        license_type: o.license_type,
        max_users: o.max_users,
        billing_email: o.billing_email,
        account_owner_id: o.account_owner_id,
        status: o.status,
        created_at: ts(&o.created_at),
        updated_at: ts(&o.updated_at),
    }
}

pub fn to_member_user(u: &user_profile::Model) -> MemberUserSummary {
    MemberUserSummary {
        id: u.id,
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        email: u.email.clone(),
        avatar_url: u.avatar_url.clone(),
    }
}

pub fn to_membership(m: organization_membership::Model, user: Option<&user_profile::Model>) -> MembershipResponse {
    MembershipResponse {
        is_active: m.is_active(),
        user: user.map(to_member_user),
        id: m.id,
        user_id: m.user_id,
        organization_id: m.organization_id,
        role: m.role,
        status: m.status,
        permissions: m.permissions.into_inner(),
        joined_at: opt_ts(&m.joined_at),
        invited_at: opt_ts(&m.invited_at),
        invited_by: m.invited_by,
        created_at: ts(&m.created_at),
        updated_at: ts(&m.updated_at),
    }
}
