//! Request and response shapes shared by the HTTP layer and the services.
//!
//! Everything here serializes as camelCase JSON. Requests implement
//! [`validation::Validate`]; responses are produced by the service mappers.
pub mod envelope;
pub mod pagination;
pub mod validation;

pub mod users;
pub mod organizations;
pub mod assessments;
pub mod content;
pub mod communities;
pub mod subscriptions;
pub mod audit;
pub mod flags;
pub mod bulk;
pub mod metrics;

pub use envelope::{ApiResponse, DeleteResponse, ErrorResponse, PaginatedResponse, PaginationMeta};
pub use pagination::{PageRequest, PaginationQuery, SortOrder};
pub use validation::{FieldError, Validate, ValidationErrors};
