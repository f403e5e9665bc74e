use models::enums::{AccountStatus, CulturalContext, LeaderTier, MinistryRole, SubscriptionTier};
use models::json::{BrandColors, EmailNotifications, PrivacySettings};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, Validator};

pub const USER_SORTS: &[&str] = &["createdAt", "updatedAt", "email", "lastName", "lastActiveAt"];

fn validate_brand_colors(v: &mut Validator, colors: Option<&BrandColors>) {
    if let Some(c) = colors {
        v.hex_color("brandColors.primary", &c.primary)
            .hex_color("brandColors.secondary", &c.secondary)
            .hex_color("brandColors.accent", &c.accent);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserProfileRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub ministry_role: MinistryRole,
    pub denomination: Option<String>,
    pub organization_name: Option<String>,
    pub years_in_ministry: Option<i32>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub language_primary: Option<String>,
    pub cultural_context: Option<CulturalContext>,
    pub leader_tier: Option<LeaderTier>,
    pub subdomain: Option<String>,
    pub custom_domain: Option<String>,
    pub brand_colors: Option<BrandColors>,
    #[serde(default)]
    pub theological_focus: Vec<String>,
    pub email_notifications: Option<EmailNotifications>,
    pub privacy_settings: Option<PrivacySettings>,
}

impl Validate for CreateUserProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.email("email", &self.email)
            .person_name("firstName", &self.first_name)
            .person_name("lastName", &self.last_name)
            .opt_length("displayName", self.display_name.as_deref(), 1, 100)
            .opt_length("bio", self.bio.as_deref(), 0, 2000)
            .url("avatarUrl", self.avatar_url.as_deref())
            .opt_length("denomination", self.denomination.as_deref(), 1, 100)
            .opt_length("organizationName", self.organization_name.as_deref(), 1, 255)
            .range_i64("yearsInMinistry", self.years_in_ministry.map(i64::from), 0, 100)
            .country_code("countryCode", self.country_code.as_deref())
            .opt_length("timezone", self.timezone.as_deref(), 1, 64)
            .opt_length("languagePrimary", self.language_primary.as_deref(), 2, 10)
            .opt_slug("subdomain", self.subdomain.as_deref())
            .opt_length("customDomain", self.custom_domain.as_deref(), 3, 255)
            .list_len("theologicalFocus", &self.theological_focus, 0, 20);
        validate_brand_colors(&mut v, self.brand_colors.as_ref());
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub ministry_role: Option<MinistryRole>,
    pub denomination: Option<String>,
    pub organization_name: Option<String>,
    pub years_in_ministry: Option<i32>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub language_primary: Option<String>,
    pub cultural_context: Option<CulturalContext>,
    pub leader_tier: Option<LeaderTier>,
    pub subdomain: Option<String>,
    pub custom_domain: Option<String>,
    pub brand_colors: Option<BrandColors>,
    pub theological_focus: Option<Vec<String>>,
    pub email_notifications: Option<EmailNotifications>,
    pub privacy_settings: Option<PrivacySettings>,
    pub onboarding_completed: Option<bool>,
    pub onboarding_step: Option<i32>,
}

impl Validate for UpdateUserProfileRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_person_name("firstName", self.first_name.as_deref())
            .opt_person_name("lastName", self.last_name.as_deref())
            .opt_length("displayName", self.display_name.as_deref(), 1, 100)
            .opt_length("bio", self.bio.as_deref(), 0, 2000)
            .url("avatarUrl", self.avatar_url.as_deref())
            .opt_length("denomination", self.denomination.as_deref(), 1, 100)
            .opt_length("organizationName", self.organization_name.as_deref(), 1, 255)
            .range_i64("yearsInMinistry", self.years_in_ministry.map(i64::from), 0, 100)
            .country_code("countryCode", self.country_code.as_deref())
            .opt_length("timezone", self.timezone.as_deref(), 1, 64)
            .opt_length("languagePrimary", self.language_primary.as_deref(), 2, 10)
            .opt_slug("subdomain", self.subdomain.as_deref())
            .opt_length("customDomain", self.custom_domain.as_deref(), 3, 255)
            .range_i64("onboardingStep", self.onboarding_step.map(i64::from), 1, 10);
        if let Some(focus) = &self.theological_focus {
            v.list_len("theologicalFocus", focus, 0, 20);
        }
        validate_brand_colors(&mut v, self.brand_colors.as_ref());
        v.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    pub search: Option<String>,
    pub ministry_role: Option<MinistryRole>,
    pub account_status: Option<AccountStatus>,
    pub subscription_tier: Option<SubscriptionTier>,
    pub country_code: Option<String>,
}

impl Validate for UserFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("search", self.search.as_deref(), 0, 100)
            .country_code("countryCode", self.country_code.as_deref());
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub bio: String,
    pub avatar_url: Option<String>,
    pub ministry_role: MinistryRole,
    pub denomination: Option<String>,
    pub organization_name: Option<String>,
    pub years_in_ministry: Option<i32>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
    pub language_primary: String,
    pub cultural_context: Option<CulturalContext>,
    pub leader_tier: Option<LeaderTier>,
    pub subdomain: Option<String>,
    pub custom_domain: Option<String>,
    pub brand_colors: BrandColors,
    pub subscription_tier: SubscriptionTier,
    pub theological_focus: Vec<String>,
    pub email_notifications: EmailNotifications,
    pub privacy_settings: PrivacySettings,
    pub onboarding_completed: bool,
    pub onboarding_step: i32,
    pub account_status: AccountStatus,
    pub created_at: String,
    pub updated_at: String,
    pub last_active_at: String,
    pub full_name: String,
    pub display_name_or_full_name: String,
    pub is_active: bool,
    pub has_completed_onboarding: bool,
}

/// Compact author/member card embedded in other resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}
