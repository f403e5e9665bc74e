use contracts::users::{UserProfileResponse, UserSummary};
use models::enums::AccountStatus;
use models::user_profile;

use super::ts;

pub fn full_name(u: &user_profile::Model) -> String {
    format!("{} {}", u.first_name, u.last_name).trim().to_string()
}

pub fn to_user_profile(u: user_profile::Model) -> UserProfileResponse {
    let full_name = full_name(&u);
    let display_name_or_full_name = u
        .display_name
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| full_name.clone());
    UserProfileResponse {
        id: u.id,
        email: u.email,
        first_name: u.first_name,
        last_name: u.last_name,
        display_name: u.display_name,
        bio: u.bio.unwrap_or_default(),
        avatar_url: u.avatar_url,
        ministry_role: u.ministry_role,
        denomination: u.denomination,
        organization_name: u.organization_name,
        years_in_ministry: u.years_in_ministry,
        country_code: u.country_code,
        timezone: u.timezone,
        language_primary: if u.language_primary.is_empty() { "en".to_string() } else { u.language_primary },
        cultural_context: u.cultural_context,
        leader_tier: u.leader_tier,
        subdomain: u.subdomain,
        custom_domain: u.custom_domain,
        brand_colors: u.brand_colors.unwrap_or_default(),
        subscription_tier: u.subscription_tier,
        theological_focus: u.theological_focus.into_inner(),
        email_notifications: u.email_notifications.unwrap_or_default(),
        privacy_settings: u.privacy_settings.unwrap_or_default(),
        onboarding_completed: u.onboarding_completed,
        onboarding_step: u.onboarding_step,
        account_status: u.account_status,
        created_at: ts(&u.created_at),
        updated_at: ts(&u.updated_at),
        last_active_at: ts(&u.last_active_at),
        full_name,
        display_name_or_full_name,
        is_active: u.account_status == AccountStatus::Active,
        has_completed_onboarding: u.onboarding_completed,
    }
}

pub fn to_user_summary(u: &user_profile::Model) -> UserSummary {
    UserSummary {
        id: u.id,
        first_name: u.first_name.clone(),
        last_name: u.last_name.clone(),
        display_name: u.display_name.clone(),
        avatar_url: u.avatar_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::fixtures;
    use models::json::{BrandColors, PrivacySettings};

    #[test]
    fn nulls_become_defaults() {
        let u = fixtures::user("ruth@church.org");
        let dto = to_user_profile(u);
        assert_eq!(dto.bio, "");
        assert_eq!(dto.brand_colors, BrandColors::default());
        assert_eq!(dto.privacy_settings, PrivacySettings::default());
        assert!(dto.email_notifications.community_updates);
        assert_eq!(dto.created_at, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn computed_names_and_flags() {
        let mut u = fixtures::user("ruth@church.org");
        let dto = to_user_profile(u.clone());
        assert_eq!(dto.full_name, "Ruth Padilla");
        assert_eq!(dto.display_name_or_full_name, "Ruth Padilla");
        assert!(!dto.is_active);
        assert!(!dto.has_completed_onboarding);

        u.display_name = Some("Pastora Ruth".into());
        u.account_status = AccountStatus::Active;
        u.onboarding_completed = true;
        let dto = to_user_profile(u);
        assert_eq!(dto.display_name_or_full_name, "Pastora Ruth");
        assert!(dto.is_active);
        assert!(dto.has_completed_onboarding);
    }

    #[test]
    fn partial_and_malformed_stored_settings_fall_back() {
        // column values decode from JSONB the same way
        let mut u = fixtures::user("ruth@church.org");
        u.brand_colors = serde_json::from_value(serde_json::json!({ "primary": "#111111" })).unwrap();
        u.privacy_settings = serde_json::from_value(serde_json::json!("not an object")).unwrap();
        u.email_notifications = serde_json::from_value(serde_json::json!({ "dailyDigest": "yes", "revenueReports": false })).unwrap();
        let dto = to_user_profile(u);
        assert_eq!(dto.brand_colors.primary, "#111111");
        assert_eq!(dto.brand_colors.accent, BrandColors::default().accent);
        assert_eq!(dto.privacy_settings, PrivacySettings::default());
        assert!(dto.email_notifications.daily_digest);
        assert!(!dto.email_notifications.revenue_reports);
    }
}
