//! JSON envelopes wrapped around every response.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pagination::PageRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data, message: None }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data, message: Some(message.into()) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 || limit == 0 { 0 } else { total.div_ceil(limit) };
        Self { page, limit, total, total_pages, has_next: page < total_pages, has_prev: page > 1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: &PageRequest, total: u64) -> Self {
        Self { success: true, data, pagination: PaginationMeta::new(page.page, page.limit, total) }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse { success: self.success, data: self.data.into_iter().map(f).collect(), pagination: self.pagination }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            code: code.into(),
            details: None,
            timestamp: Utc::now().to_rfc3339(),
            path: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Body returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_no_pages() {
        let m = PaginationMeta::new(1, 20, 0);
        assert_eq!(m.total_pages, 0);
        assert!(!m.has_next);
        assert!(!m.has_prev);
    }

    #[test]
    fn partial_last_page_rounds_up() {
        let m = PaginationMeta::new(2, 20, 41);
        assert_eq!(m.total_pages, 3);
        assert!(m.has_next);
        assert!(m.has_prev);
        let last = PaginationMeta::new(3, 20, 41);
        assert!(!last.has_next);
    }

    #[test]
    fn exact_multiple_and_page_beyond_end() {
        let m = PaginationMeta::new(2, 10, 20);
        assert_eq!(m.total_pages, 2);
        assert!(!m.has_next);
        let beyond = PaginationMeta::new(5, 10, 20);
        assert!(!beyond.has_next);
        assert!(beyond.has_prev);
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let page = PageRequest::new(1, 10);
        let body = PaginatedResponse::new(vec![1, 2, 3], &page, 3);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert_eq!(json["pagination"]["hasNext"], false);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn error_response_omits_empty_optionals() {
        let e = ErrorResponse::new("Not Found", "User with ID x not found", "NOT_FOUND");
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("details").is_none());
        assert!(json.get("path").is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }
}
