use contracts::ValidationErrors;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),
    /// Invalid request that is not tied to a single field.
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// A lookup by something other than id came back empty.
    #[error("{0}")]
    Missing(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("foreign key violation: {0}")]
    ForeignKey(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }

    pub fn access_denied() -> Self {
        Self::Forbidden("Access denied".into())
    }

    pub fn insufficient_permissions() -> Self {
        Self::Forbidden("Insufficient permissions".into())
    }

    /// Message safe to show to callers.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(_) => "Validation failed".into(),
            ServiceError::BadRequest(m)
            | ServiceError::Forbidden(m)
            | ServiceError::Conflict(m)
            | ServiceError::Missing(m) => m.clone(),
            ServiceError::NotFound { .. } => self.to_string(),
            ServiceError::ForeignKey(_) => "Referenced record does not exist".into(),
            ServiceError::Db(_) => "A database error occurred".into(),
            ServiceError::Internal(_) => "An unexpected error occurred".into(),
        }
    }
}

/// Public message for a unique constraint hit; the constraint name stays in the logs.
pub const RESOURCE_EXISTS: &str = "Resource already exists";

pub(crate) fn unique_violation(detail: &str) -> ServiceError {
    tracing::warn!(constraint = %detail, "unique constraint violated");
    ServiceError::Conflict(RESOURCE_EXISTS.into())
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => unique_violation(&detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => ServiceError::ForeignKey(detail),
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let id = Uuid::nil();
        let e = ServiceError::not_found("Organization", id);
        assert_eq!(e.to_string(), format!("Organization with ID {} not found", id));
        assert_eq!(e.public_message(), e.to_string());
    }

    #[test]
    fn db_details_are_not_public() {
        let e: ServiceError = DbErr::Custom("connection refused at 10.0.0.1".into()).into();
        assert!(matches!(e, ServiceError::Db(_)));
        assert_eq!(e.public_message(), "A database error occurred");
    }

    #[test]
    fn unique_violation_hides_constraint_name() {
        let e = unique_violation("duplicate key value violates unique constraint \"user_profiles_email_key\"");
        assert!(matches!(e, ServiceError::Conflict(_)));
        assert_eq!(e.public_message(), RESOURCE_EXISTS);
        assert!(!e.public_message().contains("user_profiles"));
    }
}
