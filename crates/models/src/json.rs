//! Typed JSON side columns.
//!
//! Every type here deserializes through `serde_json::Value` and never fails:
//! a missing, mistyped or malformed field takes its default, so a bad JSONB
//! value in one row cannot fail the whole query.
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn str_or(v: &Value, key: &str, default: String) -> String {
    v.get(key).and_then(Value::as_str).map(str::to_string).unwrap_or(default)
}

fn opt_str(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

fn bool_or(v: &Value, key: &str, default: bool) -> bool {
    v.get(key).and_then(Value::as_bool).unwrap_or(default)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(from = "Value")]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for BrandColors {
    fn default() -> Self {
        Self { primary: "#2563eb".into(), secondary: "#64748b".into(), accent: "#059669".into() }
    }
}

impl From<Value> for BrandColors {
    fn from(v: Value) -> Self {
        let d = Self::default();
        Self {
            primary: str_or(&v, "primary", d.primary),
            secondary: str_or(&v, "secondary", d.secondary),
            accent: str_or(&v, "accent", d.accent),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct EmailNotifications {
    pub daily_digest: bool,
    pub collaboration_requests: bool,
    pub revenue_reports: bool,
    pub community_updates: bool,
}

impl Default for EmailNotifications {
    fn default() -> Self {
        Self { daily_digest: true, collaboration_requests: true, revenue_reports: true, community_updates: true }
    }
}

impl From<Value> for EmailNotifications {
    fn from(v: Value) -> Self {
        let d = Self::default();
        Self {
            daily_digest: bool_or(&v, "dailyDigest", d.daily_digest),
            collaboration_requests: bool_or(&v, "collaborationRequests", d.collaboration_requests),
            revenue_reports: bool_or(&v, "revenueReports", d.revenue_reports),
            community_updates: bool_or(&v, "communityUpdates", d.community_updates),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct PrivacySettings {
    pub public_profile: bool,
    pub show_assessment_results: bool,
    pub allow_networking: bool,
    pub share_analytics: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self { public_profile: true, show_assessment_results: false, allow_networking: true, share_analytics: false }
    }
}

impl From<Value> for PrivacySettings {
    fn from(v: Value) -> Self {
        let d = Self::default();
        Self {
            public_profile: bool_or(&v, "publicProfile", d.public_profile),
            show_assessment_results: bool_or(&v, "showAssessmentResults", d.show_assessment_results),
            allow_networking: bool_or(&v, "allowNetworking", d.allow_networking),
            share_analytics: bool_or(&v, "shareAnalytics", d.share_analytics),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl From<Value> for Address {
    fn from(v: Value) -> Self {
        Self {
            street: opt_str(&v, "street"),
            city: opt_str(&v, "city"),
            state: opt_str(&v, "state"),
            country: opt_str(&v, "country"),
            postal_code: opt_str(&v, "postalCode"),
        }
    }
}

/// JSON array of strings (tags, permissions, keywords).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(from = "Value")]
pub struct StringList(pub Vec<String>);

/// Non-string entries are dropped; anything but an array is empty.
impl From<Value> for StringList {
    fn from(v: Value) -> Self {
        let items = v.as_array().map(|a| a.iter().filter_map(Value::as_str).map(str::to_string).collect());
        StringList(items.unwrap_or_default())
    }
}

impl StringList {
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }
}

impl From<Vec<String>> for StringList {
    fn from(v: Vec<String>) -> Self {
        StringList(v)
    }
}

/// JSON array of UUIDs (co-authors, suggested peers).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(from = "Value")]
pub struct UuidList(pub Vec<uuid::Uuid>);

impl From<Value> for UuidList {
    fn from(v: Value) -> Self {
        let items = v
            .as_array()
            .map(|a| a.iter().filter_map(Value::as_str).filter_map(|s| uuid::Uuid::parse_str(s).ok()).collect());
        UuidList(items.unwrap_or_default())
    }
}

impl From<Vec<uuid::Uuid>> for UuidList {
    fn from(v: Vec<uuid::Uuid>) -> Self {
        UuidList(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_defaults() {
        let b = BrandColors::default();
        assert_eq!(b.primary, "#2563eb");
        assert!(EmailNotifications::default().daily_digest);
        let p = PrivacySettings::default();
        assert!(p.public_profile && p.allow_networking);
        assert!(!p.show_assessment_results && !p.share_analytics);
    }

    #[test]
    fn partial_settings_fill_missing_fields() {
        let p: PrivacySettings = serde_json::from_str(r#"{"shareAnalytics":true}"#).unwrap();
        assert!(p.share_analytics);
        assert!(p.public_profile);
    }

    #[test]
    fn partial_or_mistyped_brand_colors_keep_defaults() {
        let b: BrandColors = serde_json::from_str(r##"{"primary":"#ffffff","accent":42}"##).unwrap();
        assert_eq!(b.primary, "#ffffff");
        assert_eq!(b.secondary, "#64748b");
        assert_eq!(b.accent, "#059669");
    }

    #[test]
    fn wrong_shape_falls_back_to_default() {
        let b: BrandColors = serde_json::from_str(r#""blue""#).unwrap();
        assert_eq!(b, BrandColors::default());
        let n: EmailNotifications = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(n, EmailNotifications::default());
        let a: Address = serde_json::from_str(r#"{"city":"Lima","postalCode":15001}"#).unwrap();
        assert_eq!(a.city.as_deref(), Some("Lima"));
        assert_eq!(a.postal_code, None);
        let l: StringList = serde_json::from_str(r#"["a",1,"b"]"#).unwrap();
        assert_eq!(l.0, vec!["a".to_string(), "b".to_string()]);
        let u: UuidList = serde_json::from_str(r#"{"not":"a list"}"#).unwrap();
        assert!(u.0.is_empty());
    }

    #[test]
    fn string_list_is_a_bare_array() {
        let l = StringList(vec!["a".into(), "b".into()]);
        assert_eq!(serde_json::to_string(&l).unwrap(), r#"["a","b"]"#);
        assert!(l.contains("b"));
    }
}
