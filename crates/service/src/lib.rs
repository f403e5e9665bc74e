//! Business rules for the ministry platform, on top of `models` and `contracts`.
//! - Repository traits sit at the seams that handlers and tests swap out.
//! - Everything returns `ServiceError`; HTTP mapping lives in the server crate.

pub mod errors;
pub mod pagination;
pub mod mappers;
pub mod scoring;
pub mod bulk;

pub mod users;
pub mod assessments;
pub mod content;
pub mod organizations;
pub mod communities;
pub mod subscriptions;
pub mod audit;
pub mod feature_flags;

#[cfg(test)]
pub mod test_support;
