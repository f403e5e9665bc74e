use contracts::communities::{CommunityMembershipResponse, CommunityResponse};
use models::{community, community_membership};

use super::ts;

pub fn to_community(c: community::Model) -> CommunityResponse {
    CommunityResponse {
        is_full: c.is_full(),
        id: c.id,
        name: c.name,
        slug: c.slug,
        description: c.description.unwrap_or_default(),
        community_type: c.community_type,
        cultural_context: c.cultural_context,
        visibility: c.visibility,
        join_approval_required: c.join_approval_required,
        max_members: c.max_members,
        moderation_level: c.moderation_level,
        current_member_count: c.current_member_count.max(0),
        created_by: c.created_by,
        is_active: c.is_active,
        created_at: ts(&c.created_at),
        updated_at: ts(&c.updated_at),
    }
}

pub fn to_community_membership(m: community_membership::Model) -> CommunityMembershipResponse {
    CommunityMembershipResponse {
        id: m.id,
        user_id: m.user_id,
        community_id: m.community_id,
        role: m.role,
        status: m.status,
        joined_at: ts(&m.joined_at),
        created_at: ts(&m.created_at),
        updated_at: ts(&m.updated_at),
    }
}
