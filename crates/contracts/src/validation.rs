//! Field-level validation shared by all request DTOs.
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("valid name regex"));
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug regex"));
static COUNTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").expect("valid country regex"));
static HEX_COLOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid color regex"));

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_SLUG_LEN: usize = 100;
pub const MAX_EMAIL_LEN: usize = 255;

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: String,
}

/// Ordered list of field failures. Order follows the order rules were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>, code: &str) -> Self {
        let mut e = Self::new();
        e.push(field, message, code);
        e
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>, code: &str) {
        self.0.push(FieldError { field: field.to_string(), message: message.into(), code: code.to_string() });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.0.extend(other.0);
    }

    /// Re-key nested errors under a prefix, e.g. `responses[2].responseValue`.
    pub fn prefixed(self, prefix: &str) -> Self {
        ValidationErrors(
            self.0
                .into_iter()
                .map(|mut e| {
                    e.field = format!("{}.{}", prefix, e.field);
                    e
                })
                .collect(),
        )
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| format!("{}: {}", e.field, e.message)).collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Accumulates rule failures for one request.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>, code: &str) -> &mut Self {
        self.errors.push(field, message, code);
        self
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min {
            if min == 1 {
                self.fail(field, format!("{} is required", field), "too_small");
            } else {
                self.fail(field, format!("must be at least {} characters", min), "too_small");
            }
        } else if len > max {
            self.fail(field, format!("must be at most {} characters", max), "too_big");
        }
        self
    }

    pub fn opt_length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> &mut Self {
        if let Some(v) = value {
            self.length(field, v, min, max);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str) -> &mut Self {
        if value.chars().count() > MAX_EMAIL_LEN {
            self.fail(field, format!("must be at most {} characters", MAX_EMAIL_LEN), "too_big");
        } else if !EMAIL_RE.is_match(value) {
            self.fail(field, "Invalid email address", "invalid_string");
        } else if value.contains('+') {
            self.fail(field, "Email aliases with '+' are not allowed", "invalid_string");
        }
        self
    }

    pub fn opt_email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.email(field, v);
        }
        self
    }

    pub fn person_name(&mut self, field: &str, value: &str) -> &mut Self {
        let len = value.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            self.length(field, value, 1, MAX_NAME_LEN);
        } else if !NAME_RE.is_match(value) {
            self.fail(
                field,
                "may only contain letters, spaces, hyphens and apostrophes",
                "invalid_string",
            );
        }
        self
    }

    pub fn opt_person_name(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.person_name(field, v);
        }
        self
    }

    pub fn slug(&mut self, field: &str, value: &str) -> &mut Self {
        let len = value.chars().count();
        if len == 0 || len > MAX_SLUG_LEN {
            self.length(field, value, 1, MAX_SLUG_LEN);
        } else if !SLUG_RE.is_match(value) {
            self.fail(
                field,
                "may only contain lowercase letters, numbers and hyphens",
                "invalid_string",
            );
        }
        self
    }

    pub fn opt_slug(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.slug(field, v);
        }
        self
    }

    pub fn country_code(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            if !COUNTRY_RE.is_match(v) {
                self.fail(field, "must be a 2-letter uppercase country code", "invalid_string");
            }
        }
        self
    }

    pub fn url(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let has_scheme = v.starts_with("http://") || v.starts_with("https://");
            let host = v.split("://").nth(1).unwrap_or("");
            if !has_scheme || host.is_empty() || v.chars().any(char::is_whitespace) {
                self.fail(field, "Invalid url", "invalid_string");
            } else if v.len() > 512 {
                self.fail(field, "must be at most 512 characters", "too_big");
            }
        }
        self
    }

    pub fn hex_color(&mut self, field: &str, value: &str) -> &mut Self {
        if !HEX_COLOR_RE.is_match(value) {
            self.fail(field, "must be a hex color like #RRGGBB", "invalid_string");
        }
        self
    }

    pub fn range_i64(&mut self, field: &str, value: Option<i64>, min: i64, max: i64) -> &mut Self {
        if let Some(v) = value {
            if v < min {
                self.fail(field, format!("must be greater than or equal to {}", min), "too_small");
            } else if v > max {
                self.fail(field, format!("must be less than or equal to {}", max), "too_big");
            }
        }
        self
    }

    pub fn range_f64(&mut self, field: &str, value: Option<f64>, min: f64, max: f64) -> &mut Self {
        if let Some(v) = value {
            if !v.is_finite() || v < min {
                self.fail(field, format!("must be greater than or equal to {}", min), "too_small");
            } else if v > max {
                self.fail(field, format!("must be less than or equal to {}", max), "too_big");
            }
        }
        self
    }

    /// Question weights: 0..=10.
    pub fn weight(&mut self, field: &str, value: Option<f64>) -> &mut Self {
        self.range_f64(field, value, 0.0, 10.0)
    }

    pub fn percentage(&mut self, field: &str, value: Option<i64>) -> &mut Self {
        self.range_i64(field, value, 0, 100)
    }

    /// Likert answers on up to a 7-point scale.
    pub fn response_value(&mut self, field: &str, value: Option<i64>) -> &mut Self {
        self.range_i64(field, value, 1, 7)
    }

    pub fn list_len<T>(&mut self, field: &str, items: &[T], min: usize, max: usize) -> &mut Self {
        if items.len() < min {
            self.fail(field, format!("must contain at least {} item(s)", min), "too_small");
        } else if items.len() > max {
            self.fail(field, format!("must contain at most {} item(s)", max), "too_big");
        }
        self
    }

    pub fn nested(&mut self, prefix: &str, result: Result<(), ValidationErrors>) -> &mut Self {
        if let Err(e) = result {
            self.errors.extend(e.prefixed(prefix));
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationErrors> {
        std::mem::take(&mut self.errors).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(f: impl FnOnce(&mut Validator)) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        f(&mut v);
        v.finish()
    }

    #[test]
    fn email_rules() {
        assert!(check(|v| {
            v.email("email", "pastor@church.org");
        })
        .is_ok());
        let err = check(|v| {
            v.email("email", "not-an-email");
        })
        .unwrap_err();
        assert_eq!(err.0[0].code, "invalid_string");
        let err = check(|v| {
            v.email("email", "pastor+alias@church.org");
        })
        .unwrap_err();
        assert!(err.0[0].message.contains('+'));
    }

    #[test]
    fn person_name_rules() {
        assert!(check(|v| {
            v.person_name("firstName", "Mary-Jane O'Neil");
        })
        .is_ok());
        assert!(check(|v| {
            v.person_name("firstName", "R2D2");
        })
        .is_err());
        let err = check(|v| {
            v.person_name("lastName", "");
        })
        .unwrap_err();
        assert_eq!(err.0[0].code, "too_small");
        assert!(check(|v| {
            v.person_name("lastName", &"a".repeat(101));
        })
        .is_err());
    }

    #[test]
    fn slug_country_color_and_url_rules() {
        assert!(check(|v| {
            v.slug("slug", "grace-church-2");
        })
        .is_ok());
        assert!(check(|v| {
            v.slug("slug", "Grace Church");
        })
        .is_err());
        assert!(check(|v| {
            v.country_code("countryCode", Some("US"));
        })
        .is_ok());
        assert!(check(|v| {
            v.country_code("countryCode", Some("usa"));
        })
        .is_err());
        assert!(check(|v| {
            v.hex_color("primary", "#2563eb");
        })
        .is_ok());
        assert!(check(|v| {
            v.hex_color("primary", "blue");
        })
        .is_err());
        assert!(check(|v| {
            v.url("website", Some("https://example.org"));
        })
        .is_ok());
        assert!(check(|v| {
            v.url("website", Some("ftp://example.org"));
        })
        .is_err());
        assert!(check(|v| {
            v.url("website", None);
        })
        .is_ok());
    }

    #[test]
    fn numeric_ranges() {
        assert!(check(|v| {
            v.weight("weight", Some(10.0));
        })
        .is_ok());
        assert!(check(|v| {
            v.weight("weight", Some(10.5));
        })
        .is_err());
        assert!(check(|v| {
            v.percentage("rollout", Some(101));
        })
        .is_err());
        assert!(check(|v| {
            v.response_value("responseValue", Some(0));
        })
        .is_err());
        assert!(check(|v| {
            v.response_value("responseValue", Some(7));
        })
        .is_ok());
    }

    #[test]
    fn errors_preserve_field_order() {
        let err = check(|v| {
            v.email("email", "bad").person_name("firstName", "").slug("slug", "Bad Slug");
        })
        .unwrap_err();
        assert_eq!(err.fields(), vec!["email", "firstName", "slug"]);
    }

    #[test]
    fn nested_errors_are_prefixed() {
        let inner = ValidationErrors::single("responseValue", "too big", "too_big");
        let err = check(|v| {
            v.nested("responses[1]", Err(inner));
        })
        .unwrap_err();
        assert_eq!(err.0[0].field, "responses[1].responseValue");
    }
}
