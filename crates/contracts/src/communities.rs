use models::enums::{
    CommunityMemberStatus, CommunityRole, CommunityType, CommunityVisibility, CulturalContext, ModerationLevel,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, Validator};

pub const COMMUNITY_SORTS: &[&str] = &["createdAt", "name", "currentMemberCount"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub community_type: CommunityType,
    pub cultural_context: Option<CulturalContext>,
    pub visibility: Option<CommunityVisibility>,
    pub join_approval_required: Option<bool>,
    pub max_members: Option<i32>,
    pub moderation_level: Option<ModerationLevel>,
}

impl Validate for CreateCommunityRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.length("name", &self.name, 1, 255)
            .slug("slug", &self.slug)
            .opt_length("description", self.description.as_deref(), 0, 2000)
            .range_i64("maxMembers", self.max_members.map(i64::from), 2, 100_000);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityFilters {
    pub search: Option<String>,
    pub community_type: Option<CommunityType>,
    pub visibility: Option<CommunityVisibility>,
}

impl Validate for CommunityFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("search", self.search.as_deref(), 0, 100);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub community_type: CommunityType,
    pub cultural_context: CulturalContext,
    pub visibility: CommunityVisibility,
    pub join_approval_required: bool,
    pub max_members: Option<i32>,
    pub moderation_level: ModerationLevel,
    pub current_member_count: i32,
    pub created_by: Uuid,
    pub is_active: bool,
    pub is_full: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMembershipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub community_id: Uuid,
    pub role: CommunityRole,
    pub status: CommunityMemberStatus,
    pub joined_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_needs_room_for_two() {
        let req: CreateCommunityRequest = serde_json::from_value(serde_json::json!({
            "name": "Planters",
            "slug": "planters",
            "communityType": "church_planting_cohort",
            "maxMembers": 1
        }))
        .unwrap();
        assert_eq!(req.validate().unwrap_err().fields(), vec!["maxMembers"]);
    }
}
