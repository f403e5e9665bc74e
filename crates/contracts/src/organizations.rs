use models::enums::{LicenseType, MembershipRole, MembershipStatus, OrganizationStatus, OrganizationType, SizeCategory};
use models::json::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, Validator};

pub const ORGANIZATION_SORTS: &[&str] = &["createdAt", "updatedAt", "name"];

fn validate_address(v: &mut Validator, address: Option<&Address>) {
    if let Some(a) = address {
        v.opt_length("address.street", a.street.as_deref(), 1, 255)
            .opt_length("address.city", a.city.as_deref(), 1, 100)
            .opt_length("address.state", a.state.as_deref(), 1, 100)
            .opt_length("address.country", a.country.as_deref(), 1, 100)
            .opt_length("address.postalCode", a.postal_code.as_deref(), 1, 20);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub organization_type: OrganizationType,
    pub size_category: Option<SizeCategory>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<Address>,
    pub license_type: Option<LicenseType>,
    pub max_users: Option<i32>,
    pub billing_email: Option<String>,
}

impl Validate for CreateOrganizationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.length("name", &self.name, 1, 255)
            .slug("slug", &self.slug)
            .opt_length("description", self.description.as_deref(), 0, 2000)
            .url("website", self.website.as_deref())
            .url("logoUrl", self.logo_url.as_deref())
            .opt_email("contactEmail", self.contact_email.as_deref())
            .opt_length("contactPhone", self.contact_phone.as_deref(), 1, 32)
            .range_i64("maxUsers", self.max_users.map(i64::from), 1, 100_000)
            .opt_email("billingEmail", self.billing_email.as_deref());
        validate_address(&mut v, self.address.as_ref());
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub organization_type: Option<OrganizationType>,
    pub size_category: Option<SizeCategory>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<Address>,
    pub license_type: Option<LicenseType>,
    pub max_users: Option<i32>,
    pub billing_email: Option<String>,
    pub status: Option<OrganizationStatus>,
}

impl Validate for UpdateOrganizationRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("name", self.name.as_deref(), 1, 255)
            .opt_length("description", self.description.as_deref(), 0, 2000)
            .url("website", self.website.as_deref())
            .url("logoUrl", self.logo_url.as_deref())
            .opt_email("contactEmail", self.contact_email.as_deref())
            .opt_length("contactPhone", self.contact_phone.as_deref(), 1, 32)
            .range_i64("maxUsers", self.max_users.map(i64::from), 1, 100_000)
            .opt_email("billingEmail", self.billing_email.as_deref());
        validate_address(&mut v, self.address.as_ref());
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberRequest {
    pub email: String,
    pub role: Option<MembershipRole>,
}

impl InviteMemberRequest {
    pub fn role_or_default(&self) -> MembershipRole {
        self.role.unwrap_or_default()
    }
}

impl Validate for InviteMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.email("email", &self.email);
        if self.role == Some(MembershipRole::Owner) {
            v.fail("role", "must be one of: admin, member, viewer", "invalid_enum_value");
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFilters {
    pub search: Option<String>,
    pub organization_type: Option<OrganizationType>,
    pub status: Option<OrganizationStatus>,
}

impl Validate for OrganizationFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("search", self.search.as_deref(), 0, 100);
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFilters {
    pub role: Option<MembershipRole>,
    pub status: Option<MembershipStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub organization_type: OrganizationType,
    pub size_category: Option<SizeCategory>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<Address>,
    pub license_type: LicenseType,
    pub max_users: i32,
    pub billing_email: Option<String>,
    pub account_owner_id: Option<Uuid>,
    pub status: OrganizationStatus,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
    pub is_trial: bool,
    pub has_custom_logo: bool,
    pub has_website: bool,
    pub member_count: u64,
    pub display_name: String,
    pub status_display: String,
    pub license_type_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: MembershipRole,
    pub status: MembershipStatus,
    pub permissions: Vec<String>,
    pub joined_at: Option<String>,
    pub invited_at: Option<String>,
    pub invited_by: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
    pub is_active: bool,
    pub user: Option<MemberUserSummary>,
}
