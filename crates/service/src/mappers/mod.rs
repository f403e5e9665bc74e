//! Row to DTO conversions.
//!
//! Mappers never fail: nullable columns fall back to defaults and every
//! timestamp is rendered as RFC 3339.
use sea_orm::prelude::DateTimeWithTimeZone;

pub mod assessments;
pub mod audit;
pub mod communities;
pub mod content;
pub mod organizations;
pub mod subscriptions;
pub mod users;

pub(crate) fn ts(t: &DateTimeWithTimeZone) -> String {
    t.to_rfc3339()
}

pub(crate) fn opt_ts(t: &Option<DateTimeWithTimeZone>) -> Option<String> {
    t.as_ref().map(ts)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{FixedOffset, TimeZone};
    use models::enums::*;
    use models::json::{StringList, UuidList};
    use sea_orm::prelude::DateTimeWithTimeZone;
    use uuid::Uuid;

    pub fn at(secs: i64) -> DateTimeWithTimeZone {
        FixedOffset::east_opt(0)
            .and_then(|tz| tz.timestamp_opt(1_704_067_200 + secs, 0).single())
            .unwrap()
    }

    pub fn user(email: &str) -> models::user_profile::Model {
        models::user_profile::Model {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: "Ruth".into(),
            last_name: "Padilla".into(),
            display_name: None,
            bio: None,
            avatar_url: None,
            ministry_role: MinistryRole::ChurchPlanter,
            denomination: None,
            organization_name: None,
            years_in_ministry: Some(4),
            country_code: Some("PE".into()),
            timezone: None,
            language_primary: "en".into(),
            cultural_context: None,
            leader_tier: None,
            subdomain: None,
            custom_domain: None,
            brand_colors: None,
            subscription_tier: SubscriptionTier::Free,
            theological_focus: StringList::default(),
            email_notifications: None,
            privacy_settings: None,
            onboarding_completed: false,
            onboarding_step: 1,
            account_status: AccountStatus::PendingVerification,
            created_at: at(0),
            updated_at: at(0),
            last_active_at: at(0),
        }
    }

    pub fn organization(name: &str) -> models::organization::Model {
        models::organization::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            description: None,
            website: None,
            logo_url: None,
            organization_type: OrganizationType::Church,
            size_category: None,
            contact_email: None,
            contact_phone: None,
            address: None,
            license_type: LicenseType::Individual,
            max_users: 1,
            billing_email: None,
            account_owner_id: None,
            status: OrganizationStatus::Trial,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    pub fn membership(user_id: Uuid, organization_id: Uuid, role: MembershipRole, status: MembershipStatus) -> models::organization_membership::Model {
        models::organization_membership::Model {
            id: Uuid::new_v4(),
            user_id,
            organization_id,
            role,
            permissions: StringList::default(),
            status,
            joined_at: Some(at(10)),
            invited_at: None,
            invited_by: None,
            created_at: at(10),
            updated_at: at(10),
        }
    }

    pub fn assessment(status: AssessmentStatus) -> models::assessment::Model {
        models::assessment::Model {
            id: Uuid::new_v4(),
            name: "APEST Profile".into(),
            slug: format!("apest-{}", Uuid::new_v4().simple()),
            description: None,
            assessment_type: AssessmentType::Apest,
            questions_count: 0,
            estimated_duration: Some(15),
            passing_score: None,
            validity_score: None,
            reliability_score: None,
            instructions: None,
            version: "1.0".into(),
            language: "en".into(),
            cultural_adaptation: CulturalContext::Universal,
            research_backed: false,
            scoring_method: ScoringMethod::Likert5,
            status,
            published_at: None,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    pub fn question(assessment_id: Uuid, order: i32, dim: Option<ApestDimension>) -> models::assessment_question::Model {
        models::assessment_question::Model {
            id: Uuid::new_v4(),
            assessment_id,
            question_text: format!("Question {}", order),
            question_type: QuestionType::Likert,
            order_index: order,
            is_required: true,
            category: None,
            weight: 1.0,
            reverse_scored: false,
            apest_dimension: dim,
            answer_options: None,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    pub fn user_assessment(user_id: Uuid, assessment_id: Uuid) -> models::user_assessment::Model {
        models::user_assessment::Model {
            id: Uuid::new_v4(),
            user_id,
            assessment_id,
            started_at: at(0),
            completed_at: None,
            completion_percentage: 0,
            raw_scores: None,
            total_score: None,
            max_possible_score: None,
            apostolic_score: None,
            prophetic_score: None,
            evangelistic_score: None,
            shepherding_score: None,
            teaching_score: None,
            normalized_scores: None,
            primary_gift: None,
            secondary_gift: None,
            response_consistency: None,
            completion_time: None,
            confidence_level: None,
            cultural_adjustment_applied: false,
            cultural_adjustment_factor: None,
            ai_insights: None,
            personalized_recommendations: None,
            suggested_peers: UuidList::default(),
            complementary_gifts: StringList::default(),
            created_at: at(0),
            updated_at: at(0),
        }
    }

    pub fn content_item(author_id: Uuid, status: ContentStatus) -> models::content_item::Model {
        models::content_item::Model {
            id: Uuid::new_v4(),
            title: "Sent Communities".into(),
            slug: format!("sent-{}", Uuid::new_v4().simple()),
            excerpt: None,
            content: None,
            author_id,
            co_authors: UuidList::default(),
            content_type: ContentType::Article,
            format: ContentFormat::Text,
            word_count: None,
            estimated_reading_time: None,
            view_count: 0,
            like_count: 0,
            share_count: 0,
            comment_count: 0,
            bookmark_count: 0,
            primary_category_id: None,
            tags: StringList::default(),
            theological_themes: StringList::default(),
            series_id: None,
            series_order: None,
            visibility: ContentVisibility::Public,
            status,
            network_amplification_score: 0.0,
            featured_image_url: None,
            video_url: None,
            audio_url: None,
            meta_title: None,
            meta_description: None,
            license_type: ContentLicense::AllRightsReserved,
            attribution_required: true,
            published_at: None,
            scheduled_at: None,
            created_at: at(0),
            updated_at: at(0),
        }
    }

    pub fn category(name: &str, order: i32) -> models::content_category::Model {
        models::content_category::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            description: None,
            parent_id: None,
            order_index: order,
            theological_discipline: None,
            movement_relevance_score: 5,
            apest_relevance: None,
            keywords: StringList::default(),
            is_active: true,
            created_at: at(0),
            updated_at: at(0),
        }
    }
}
