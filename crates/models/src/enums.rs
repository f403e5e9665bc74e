//! Short-string enumerations stored in `varchar` columns.
//!
//! Every enum serializes to the same snake_case value it is stored as, so
//! the wire form and the column form never drift.
use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
        #[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
        pub enum $name {
            $(
                #[sea_orm(string_value = $value)]
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            /// Comma separated list of accepted values, used in validation messages.
            pub fn expected() -> String {
                Self::ALL.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownVariant { kind: stringify!($name), value: other.to_string() }),
                }
            }
        }
    };
}

string_enum!(MinistryRole {
    SeniorPastor => "senior_pastor",
    AssociatePastor => "associate_pastor",
    ChurchPlanter => "church_planter",
    DenominationalLeader => "denominational_leader",
    SeminaryProfessor => "seminary_professor",
    SeminaryStudent => "seminary_student",
    MinistryStaff => "ministry_staff",
    Missionary => "missionary",
    MarketplaceMinister => "marketplace_minister",
    NonprofitLeader => "nonprofit_leader",
    Consultant => "consultant",
    AcademicResearcher => "academic_researcher",
    EmergingLeader => "emerging_leader",
    Other => "other",
});

string_enum!(CulturalContext {
    Western => "western",
    Eastern => "eastern",
    African => "african",
    LatinAmerican => "latin_american",
    MiddleEastern => "middle_eastern",
    Oceanic => "oceanic",
    Universal => "universal",
    Global => "global",
});

string_enum!(LeaderTier {
    Core => "core",
    Network => "network",
    Emerging => "emerging",
    Community => "community",
});

string_enum!(SubscriptionTier {
    Free => "free",
    Individual => "individual",
    Professional => "professional",
    Leader => "leader",
    Institutional => "institutional",
});

string_enum!(AccountStatus {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
    PendingVerification => "pending_verification",
});

string_enum!(OrganizationType {
    Church => "church",
    Denomination => "denomination",
    Seminary => "seminary",
    MinistryNetwork => "ministry_network",
    Nonprofit => "nonprofit",
    Business => "business",
    Other => "other",
});

string_enum!(SizeCategory {
    Startup => "startup",
    Small => "small",
    Medium => "medium",
    Large => "large",
    Enterprise => "enterprise",
});

string_enum!(
    /// Organization license.
    LicenseType {
        Individual => "individual",
        Institutional => "institutional",
        Enterprise => "enterprise",
    }
);

string_enum!(OrganizationStatus {
    Active => "active",
    Inactive => "inactive",
    Trial => "trial",
    Suspended => "suspended",
});

string_enum!(MembershipRole {
    Owner => "owner",
    Admin => "admin",
    Member => "member",
    Viewer => "viewer",
});

string_enum!(MembershipStatus {
    Active => "active",
    Inactive => "inactive",
    Pending => "pending",
    Invited => "invited",
});

string_enum!(AssessmentType {
    Apest => "apest",
    Mdna => "mdna",
    CulturalIntelligence => "cultural_intelligence",
    LeadershipStyle => "leadership_style",
    SpiritualGifts => "spiritual_gifts",
    Other => "other",
});

string_enum!(ScoringMethod {
    Likert5 => "likert_5",
    Likert7 => "likert_7",
    Binary => "binary",
    Ranking => "ranking",
    Weighted => "weighted",
});

string_enum!(AssessmentStatus {
    Draft => "draft",
    Active => "active",
    Archived => "archived",
    UnderReview => "under_review",
});

string_enum!(QuestionType {
    Likert => "likert",
    MultipleChoice => "multiple_choice",
    Binary => "binary",
    Ranking => "ranking",
    Text => "text",
});

string_enum!(
    /// The five APEST gifts, in canonical order. Ties in scoring keep this order.
    ApestDimension {
        Apostolic => "apostolic",
        Prophetic => "prophetic",
        Evangelistic => "evangelistic",
        Shepherding => "shepherding",
        Teaching => "teaching",
    }
);

string_enum!(ContentType {
    Article => "article",
    Video => "video",
    Podcast => "podcast",
    Framework => "framework",
    Tool => "tool",
    CaseStudy => "case_study",
    Interview => "interview",
    CourseLesson => "course_lesson",
});

string_enum!(ContentFormat {
    Text => "text",
    Video => "video",
    Audio => "audio",
    Interactive => "interactive",
    Pdf => "pdf",
    Presentation => "presentation",
});

string_enum!(ContentVisibility {
    Public => "public",
    Premium => "premium",
    Vip => "vip",
    Private => "private",
    Organization => "organization",
    InviteOnly => "invite_only",
});

string_enum!(ContentStatus {
    Draft => "draft",
    Published => "published",
    Archived => "archived",
    UnderReview => "under_review",
    Scheduled => "scheduled",
});

string_enum!(ContentLicense {
    AllRightsReserved => "all_rights_reserved",
    CreativeCommons => "creative_commons",
    PublicDomain => "public_domain",
    FairUse => "fair_use",
});

string_enum!(CommunityType {
    GeneralDiscussion => "general_discussion",
    ChurchPlantingCohort => "church_planting_cohort",
    LeadershipDevelopment => "leadership_development",
    ApestGroup => "apest_group",
    RegionalHub => "regional_hub",
    InterestGroup => "interest_group",
    StudyGroup => "study_group",
});

string_enum!(CommunityVisibility {
    Public => "public",
    Private => "private",
    InviteOnly => "invite_only",
    Organization => "organization",
});

string_enum!(ModerationLevel {
    Open => "open",
    Moderated => "moderated",
    Strict => "strict",
});

string_enum!(CommunityRole {
    Member => "member",
    Moderator => "moderator",
    Admin => "admin",
    Owner => "owner",
});

string_enum!(CommunityMemberStatus {
    Active => "active",
    Inactive => "inactive",
    Pending => "pending",
    Banned => "banned",
    Left => "left",
});

string_enum!(PlanType {
    Free => "free",
    Individual => "individual",
    Professional => "professional",
    Leader => "leader",
    Institutional => "institutional",
    Enterprise => "enterprise",
});

string_enum!(SubscriptionStatus {
    Active => "active",
    Cancelled => "cancelled",
    PastDue => "past_due",
    Unpaid => "unpaid",
    Trialing => "trialing",
    Paused => "paused",
});

string_enum!(BillingCycle {
    Monthly => "monthly",
    Annual => "annual",
});

string_enum!(RiskLevel {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

impl Default for MembershipRole {
    fn default() -> Self {
        MembershipRole::Member
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Low
    }
}

impl MembershipRole {
    /// Owners and admins may manage an organization.
    pub fn can_manage(&self) -> bool {
        matches!(self, MembershipRole::Owner | MembershipRole::Admin)
    }
}

impl LicenseType {
    pub fn display(&self) -> &'static str {
        match self {
            LicenseType::Individual => "Individual",
            LicenseType::Institutional => "Institutional",
            LicenseType::Enterprise => "Enterprise",
        }
    }
}

impl OrganizationStatus {
    pub fn display(&self) -> &'static str {
        match self {
            OrganizationStatus::Active => "Active",
            OrganizationStatus::Inactive => "Inactive",
            OrganizationStatus::Trial => "Trial",
            OrganizationStatus::Suspended => "Suspended",
        }
    }
}

impl ApestDimension {
    pub fn label(&self) -> &'static str {
        match self {
            ApestDimension::Apostolic => "Apostolic",
            ApestDimension::Prophetic => "Prophetic",
            ApestDimension::Evangelistic => "Evangelistic",
            ApestDimension::Shepherding => "Shepherding",
            ApestDimension::Teaching => "Teaching",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_values_round_trip_through_from_str() {
        for role in MinistryRole::ALL {
            assert_eq!(role.as_str().parse::<MinistryRole>().unwrap(), *role);
        }
        assert_eq!(MinistryRole::ALL.len(), 14);
        assert_eq!("invite_only".parse::<ContentVisibility>().unwrap(), ContentVisibility::InviteOnly);
    }

    #[test]
    fn unknown_value_is_rejected() {
        let err = "bishop".parse::<MinistryRole>().unwrap_err();
        assert_eq!(err.kind, "MinistryRole");
        assert_eq!(err.to_string(), "unknown MinistryRole value: bishop");
    }

    #[test]
    fn serde_uses_snake_case_values() {
        let json = serde_json::to_string(&CommunityType::ChurchPlantingCohort).unwrap();
        assert_eq!(json, "\"church_planting_cohort\"");
        let back: ScoringMethod = serde_json::from_str("\"likert_5\"").unwrap();
        assert_eq!(back, ScoringMethod::Likert5);
    }

    #[test]
    fn active_value_matches_column_string() {
        assert_eq!(AccountStatus::PendingVerification.to_value(), "pending_verification".to_string());
        assert_eq!(ApestDimension::try_from_value(&"teaching".to_string()).unwrap(), ApestDimension::Teaching);
    }

    #[test]
    fn expected_lists_all_values() {
        assert_eq!(BillingCycle::expected(), "monthly, annual");
        assert!(MembershipRole::Admin.can_manage());
        assert!(!MembershipRole::Viewer.can_manage());
    }
}
