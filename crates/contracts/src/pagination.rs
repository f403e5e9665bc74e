//! `page`, `limit`, `sort` and `order` query parameters.
use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, Validator};

pub const DEFAULT_PAGE_LIMIT: u64 = 20;
pub const ASSESSMENT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;
/// Keeps `(page - 1) * limit` well inside an `i64` offset.
pub const MAX_PAGE: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Raw pagination query as received. Resolve it before use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
}

/// Validated pagination with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub sort: Option<String>,
    pub order: SortOrder,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self { page, limit, sort: None, order: SortOrder::Desc }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Zero-based page index, as used by SeaORM paginators.
    pub fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

impl PaginationQuery {
    /// Applies defaults and rejects out-of-range values. `sort` must be one of `allowed_sorts`.
    pub fn resolve(&self, default_limit: u64, allowed_sorts: &[&str]) -> Result<PageRequest, ValidationErrors> {
        let mut v = Validator::new();
        if let Some(page) = self.page {
            if page < 1 {
                v.fail("page", "must be greater than or equal to 1", "too_small");
            } else if page > MAX_PAGE {
                v.fail("page", format!("must be less than or equal to {}", MAX_PAGE), "too_big");
            }
        }
        if let Some(limit) = self.limit {
            v.range_i64("limit", Some(limit.min(i64::MAX as u64) as i64), 1, MAX_PAGE_LIMIT as i64);
        }
        if let Some(sort) = &self.sort {
            if !allowed_sorts.contains(&sort.as_str()) {
                v.fail("sort", format!("must be one of: {}", allowed_sorts.join(", ")), "invalid_enum_value");
            }
        }
        v.finish()?;
        Ok(PageRequest {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(default_limit),
            sort: self.sort.clone(),
            order: self.order.unwrap_or_default(),
        })
    }
}
